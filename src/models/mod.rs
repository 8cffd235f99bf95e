pub mod deadline;
pub mod quiz;

pub use deadline::Deadline;
pub use quiz::{Answer, AnswerValue, GradingResult, PageSnapshot, QuizRequest};
