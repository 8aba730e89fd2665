//! 试卷服务 - 业务能力层
//!
//! 提示词 → LLM → 解析，得到一批题目；以及请求模型解释某道题

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::models::Question;
use crate::services::llm_service::TextCompleter;
use crate::services::parser::{ParseMode, ResponseParser};
use crate::services::prompt::{prepare_clarification_prompt, prepare_prompt, ExamRequest};
use crate::utils::logging::truncate_text;

/// 试卷服务
pub struct ExamService<C> {
    completer: C,
    parser: ResponseParser,
}

impl<C: TextCompleter> ExamService<C> {
    pub fn new(completer: C, mode: ParseMode) -> Result<Self> {
        let parser = ResponseParser::new(mode).context("无法创建响应解析器")?;
        Ok(Self { completer, parser })
    }

    pub fn completer(&self) -> &C {
        &self.completer
    }

    /// 生成一批题目
    pub async fn get_questions(&self, request: &ExamRequest) -> Result<Vec<Question>> {
        anyhow::ensure!(
            request.is_within_bounds(),
            "题目数量 {} 或选项数量 {} 超出范围",
            request.number_of_questions,
            request.number_of_answers
        );

        let prompt = prepare_prompt(
            &request.topics,
            request.number_of_questions,
            request.number_of_answers,
        );
        debug!("生成试卷提示词: {}", prompt);

        let response = self
            .completer
            .complete_text(&prompt, &[])
            .await
            .context("生成题目失败")?;

        debug!("LLM 原始响应: {}", truncate_text(&response, 200));

        let questions = self.parser.parse(&response);

        info!(
            "✓ 解析完成: 请求 {} 道题, 得到 {} 道题",
            request.number_of_questions,
            questions.len()
        );
        if let Ok(json) = serde_json::to_string_pretty(&questions) {
            debug!("题目数据: {}", json);
        }

        Ok(questions)
    }

    /// 请求模型解释一道题
    pub async fn clarify_question(&self, question: &Question) -> Result<String> {
        let prompt = prepare_clarification_prompt(question);
        debug!("题目 {} 解释提示词: {}", question.id, prompt);

        self.completer
            .complete_text(&prompt, &[])
            .await
            .with_context(|| format!("解释题目 {} 失败", question.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_service::ChatTurn;
    use std::sync::Mutex;

    /// 返回固定回复，并记录收到的提示词
    struct ScriptedCompleter {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompleter {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextCompleter for ScriptedCompleter {
        async fn complete_text(&self, prompt: &str, _previous_messages: &[ChatTurn]) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_get_questions() {
        let completer = ScriptedCompleter::replying("1. Capital of France?\na) Berlin\nb) **Paris**\n\n2. Largest ocean?\na) **Pacific**\nb) Atlantic");
        let service = ExamService::new(completer, ParseMode::Permissive).unwrap();

        let questions = service
            .get_questions(&ExamRequest::new("geography", 5, 3))
            .await
            .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer_text(), Some("Paris"));
        assert_eq!(questions[1].correct_answer_text(), Some("Pacific"));

        let prompts = service.completer().prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("with 5 questions and 3 of possible answers"));
        assert!(prompts[0].contains("about geography"));
    }

    #[tokio::test]
    async fn test_get_questions_error_propagates() {
        let service = ExamService::new(ScriptedCompleter::failing(), ParseMode::Permissive).unwrap();
        let result = service.get_questions(&ExamRequest::new("x", 5, 3)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_out_of_bounds_request_is_not_sent() {
        let service = ExamService::new(ScriptedCompleter::replying("1. Q?\na) **x**"), ParseMode::Permissive).unwrap();

        assert!(service.get_questions(&ExamRequest::new("x", 50, 3)).await.is_err());
        assert!(service.get_questions(&ExamRequest::new("x", 5, 6)).await.is_err());
        assert!(service.completer().prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clarify_question() {
        let service = ExamService::new(
            ScriptedCompleter::replying("Because Paris is the capital."),
            ParseMode::Permissive,
        )
        .unwrap();
        let question = Question::new(
            1,
            "Capital of France?",
            vec!["Berlin".to_string(), "Paris".to_string()],
            Some(1),
        );

        let clarification = service.clarify_question(&question).await.unwrap();
        assert_eq!(clarification, "Because Paris is the capital.");

        let prompts = service.completer().prompts.lock().unwrap();
        assert!(prompts[0].contains("Why the correct answer is b?"));
    }
}
