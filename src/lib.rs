//! # Exam Generator
//!
//! 借助大语言模型生成选择题试卷，在终端中答题、评分，并导出为 PDF
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `prompt` - 固定模板的提示词
//! - `LlmService` - 调用 LLM（`TextCompleter` 接口）
//! - `ResponseParser` - 把 LLM 的文本响应解析为题目
//! - `ExamService` - 生成题目、请求解释
//! - `DocumentService` - Markdown / PDF 导出（`PdfConverter` 接口）
//!
//! ### ② 流程层（Workflow）
//! - `ExamSession` - 一次考试的全部状态和评分
//!
//! ### ③ 编排层（Orchestration）
//! - `App` - 按当前界面（`ExamPage`）循环渲染
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, ConfigError, ExportError, LlmError};
pub use models::{ExamPage, Question};
pub use orchestrator::App;
pub use services::{
    DocumentService, ExamRequest, ExamService, LlmService, MdPdfConverter, ParseMode,
    PdfConverter, TextCompleter,
};
pub use workflow::{ExamScore, ExamSession};
