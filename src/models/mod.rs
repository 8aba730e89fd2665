pub mod page;
pub mod question;

pub use page::ExamPage;
pub use question::{answer_letter, Question, CORRECT_ANSWER_NOT_FOUND};
