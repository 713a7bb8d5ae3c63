pub mod difficulty;
pub mod paper;
pub mod question;

pub use difficulty::{Difficulty, DifficultyCounts};
pub use paper::QuestionPaper;
pub use question::QuestionRecord;
