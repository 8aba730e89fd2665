pub mod document;
pub mod exam_service;
pub mod llm_service;
pub mod parser;
pub mod prompt;

pub use document::{DocumentService, MdPdfConverter, PdfConverter};
pub use exam_service::ExamService;
pub use llm_service::{ChatRole, ChatTurn, LlmService, TextCompleter};
pub use parser::{ParseMode, ResponseParser};
pub use prompt::ExamRequest;
