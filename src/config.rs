//! Runtime configuration.
//!
//! Defaults live here; `main.rs` overrides them from command-line flags.

use std::path::PathBuf;

use crate::parser::cache::DEFAULT_CACHE_PREFIX;
use crate::parser::extract::DEFAULT_WORKERS;

const APP_DIR_NAME: &str = "pdf-quiz";

/// Settings for the question extraction pipeline.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Directory holding cache entries.
    pub cache_dir: PathBuf,
    /// File name prefix of cache entries.
    pub cache_prefix: String,
    /// Page extraction worker count.
    pub workers: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Settings for quiz sessions.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub exam_question_count: usize,
    /// Percentage needed to pass in exam mode.
    pub exam_passing_score: f64,
    /// Percentage needed to pass in practice mode.
    pub practice_passing_score: f64,
    pub show_explanations: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            exam_question_count: 65,
            exam_passing_score: 70.0,
            practice_passing_score: 80.0,
            show_explanations: true,
        }
    }
}

/// Per-user cache directory, or the working directory when there is none.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Per-user data directory for logs.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}
