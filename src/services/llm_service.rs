//! LLM 服务 - 业务能力层
//!
//! 只负责"把提示词发给模型，拿回文本"，不关心题目格式
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点、组织 ID 和模型
//! - 不重试、不限流、不流式输出，错误直接向上返回

use std::future::Future;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};

/// 对话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 一条对话消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 文本补全能力
///
/// `ExamService` 只依赖这个接口，测试时可以替换成固定回复
pub trait TextCompleter {
    /// 发送提示词（以及之前的对话），返回第一个候选的文本
    fn complete_text(
        &self,
        prompt: &str,
        previous_messages: &[ChatTurn],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let mut openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        if let Some(org_id) = &config.llm_org_id {
            openai_config = openai_config.with_org_id(org_id);
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 构建消息列表：当前提示词在前，之前的对话追加在后
    fn build_messages(
        prompt: &str,
        previous_messages: &[ChatTurn],
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(previous_messages.len() + 1);

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        for turn in previous_messages {
            let message = match turn.role {
                ChatRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(turn.content.as_str())
                        .build()?,
                ),
                ChatRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(turn.content.as_str())
                        .build()?,
                ),
                ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(turn.content.as_str())
                        .build()?,
                ),
            };
            messages.push(message);
        }

        Ok(messages)
    }
}

impl TextCompleter for LlmService {
    async fn complete_text(&self, prompt: &str, previous_messages: &[ChatTurn]) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!(
            "提示词长度: {} 字符, 历史消息: {} 条",
            prompt.len(),
            previous_messages.len()
        );

        let messages = Self::build_messages(prompt, previous_messages)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::from(LlmError::ApiCallFailed {
                model: self.model_name.clone(),
                source: e,
            })
        })?;

        debug!("LLM API 调用成功");

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::from(LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })
        })?;

        let content = choice.message.content.ok_or_else(|| {
            AppError::from(LlmError::EmptyContent {
                model: self.model_name.clone(),
            })
        })?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 创建测试用的 LlmService
    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("OPENAI_TOKEN").unwrap_or_default(),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_build_messages_order() {
        let messages = LlmService::build_messages(
            "Explain",
            &[ChatTurn::assistant("Earlier reply"), ChatTurn::user("Follow-up")],
        )
        .unwrap();

        assert_eq!(messages.len(), 3);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_model_name_from_config() {
        let service = create_test_service();
        assert_eq!(service.model_name(), "gpt-3.5-turbo");
    }

    /// 测试真实的 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// OPENAI_TOKEN=... cargo test test_complete_text -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_complete_text() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let response = service
            .complete_text("Reply with the single word: pong", &[])
            .await
            .expect("LLM 调用失败");

        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
