use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "exam_generator.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    /// 组织 ID（可选）
    pub llm_org_id: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 文档导出配置 ---
    /// Markdown 转 PDF 的外部程序
    pub pdf_converter_bin: String,
    /// 转换时使用的临时 Markdown 文件
    pub temp_markdown_file: String,
    /// 导出的 PDF 文件
    pub output_pdf_file: String,
    /// 严格解析：丢弃没有选项或没有正确答案的题目
    pub strict_parsing: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 实际加载的配置文件，日志初始化后再输出
    #[serde(skip)]
    pub config_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_org_id: None,
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
            pdf_converter_bin: "mdpdf".to_string(),
            temp_markdown_file: "__temp.md".to_string(),
            output_pdf_file: "questions.pdf".to_string(),
            strict_parsing: false,
            verbose_logging: false,
            config_file: None,
        }
    }
}

impl Config {
    /// 加载配置：默认值 ← TOML 配置文件（如果存在） ← 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("EXAM_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            config_file: Some(path.to_string()),
            ..config
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            llm_api_key: std::env::var("OPENAI_TOKEN").unwrap_or(self.llm_api_key),
            llm_org_id: std::env::var("OPENAI_ORG").ok().or(self.llm_org_id),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            pdf_converter_bin: std::env::var("PDF_CONVERTER_BIN").unwrap_or(self.pdf_converter_bin),
            temp_markdown_file: std::env::var("TEMP_MARKDOWN_FILE").unwrap_or(self.temp_markdown_file),
            output_pdf_file: std::env::var("OUTPUT_PDF_FILE").unwrap_or(self.output_pdf_file),
            strict_parsing: std::env::var("STRICT_PARSING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.strict_parsing),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            config_file: self.config_file,
        }
    }

    /// 检查必需的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            llm_api_key = "sk-test"
            llm_org_id = "org-123"
            strict_parsing = true
            "#,
        )
        .unwrap();

        assert_eq!(config.llm_api_key, "sk-test");
        assert_eq!(config.llm_org_id.as_deref(), Some("org-123"));
        assert!(config.strict_parsing);
        assert_eq!(config.llm_model_name, "gpt-3.5-turbo");
        assert_eq!(config.pdf_converter_bin, "mdpdf");
        assert_eq!(config.output_pdf_file, "questions.pdf");
    }

    #[test]
    fn test_from_file_records_source() {
        let path = std::env::temp_dir().join(format!("exam_generator_config_{}.toml", std::process::id()));
        std::fs::write(&path, "llm_model_name = \"gpt-4o-mini\"\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = Config::from_file(&path_str).unwrap();
        assert_eq!(config.llm_model_name, "gpt-4o-mini");
        assert_eq!(config.config_file.as_deref(), Some(path_str.as_str()));
        assert_eq!(Config::default().config_file, None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("strict_parsing = \"maybe\"").is_err());
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let config = Config {
            llm_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
