pub mod session;

pub use session::{ExamScore, ExamSession};
