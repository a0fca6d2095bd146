mod question;
mod state;

pub use question::{Difficulty, Question, QuestionError, Topic};
pub use state::AppState;
