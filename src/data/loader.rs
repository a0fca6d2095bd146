use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::ParserConfig;
use crate::models::Question;
use crate::parser::cache::CacheEntry;
use crate::parser::{ParseError, QuestionParser};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} must contain at least one question")]
    Empty(PathBuf),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Where a set of questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// Freshly extracted from a document.
    Parsed,
    /// Served from the parse cache.
    Cache,
    /// Imported from a JSON question bank.
    Json,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub path: PathBuf,
    pub questions: Vec<Question>,
    pub source: QuestionSource,
}

/// A JSON bank is either a bare list of questions or a saved cache entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionBank {
    List(Vec<Question>),
    Entry(CacheEntry),
}

/// Load questions from `path`: JSON files are imported directly, anything
/// else goes through the PDF pipeline.
pub fn load_questions<P: AsRef<Path>>(path: P, config: &ParserConfig) -> Result<LoadOutcome, LoadError> {
    let path = path.as_ref();
    if is_json(path) {
        let questions = load_questions_from_json(path)?;
        return Ok(LoadOutcome {
            path: path.to_path_buf(),
            questions,
            source: QuestionSource::Json,
        });
    }

    let outcome = QuestionParser::new(config).parse_file(path)?;
    Ok(LoadOutcome {
        path: path.to_path_buf(),
        questions: outcome.questions,
        source: if outcome.from_cache {
            QuestionSource::Cache
        } else {
            QuestionSource::Parsed
        },
    })
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let bank: QuestionBank = serde_json::from_str(&json_content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = match bank {
        QuestionBank::List(questions) => questions,
        QuestionBank::Entry(entry) => entry.questions,
    };

    if questions.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    info!("Imported {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
