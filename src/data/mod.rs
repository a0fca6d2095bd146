mod loader;
mod worker;

pub use loader::{LoadError, LoadOutcome, QuestionSource, load_questions, load_questions_from_json};
pub use worker::{LoadHandle, LoadResult, spawn_load};
