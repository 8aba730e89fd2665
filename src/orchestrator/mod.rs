//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (界面循环，持有 ExamSession)
//!     ↓
//! workflow::ExamSession (题目、作答、当前界面、解释缓存)
//!     ↓
//! services (能力层：prompt / llm / parser / document)
//!     ↓
//! 外部服务 (LLM API、mdpdf)
//! ```

pub mod app;

pub use app::App;
