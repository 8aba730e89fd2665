use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误")]
    Config(#[from] ConfigError),
    /// LLM 服务错误
    #[error("LLM错误")]
    Llm(#[from] LlmError),
    /// PDF 导出错误
    #[error("导出错误")]
    Export(#[from] ExportError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 没有配置 API 密钥
    #[error("未配置 API 密钥 (环境变量 OPENAI_TOKEN 或配置文件中的 llm_api_key)")]
    MissingApiKey,
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path})")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("TOML解析失败 ({path})")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model})")]
    ApiCallFailed {
        model: String,
        #[source]
        source: async_openai::error::OpenAIError,
    },
    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// PDF 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 无法启动转换程序
    #[error("无法启动转换程序 {program}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 转换程序返回非零状态
    #[error("转换程序 {program} 执行失败 (状态: {status}){}", stderr_suffix(.stderr))]
    ConverterFailed {
        program: String,
        status: String,
        stderr: String,
    },
    /// 没有可导出的题目
    #[error("没有可导出的题目")]
    NoQuestions,
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
