//! PDF question extraction pipeline.
//!
//! fingerprint -> cache lookup -> page extraction -> pattern matching ->
//! normalization + classification -> cache write.

pub mod cache;
pub mod classify;
pub mod extract;
pub mod fingerprint;
pub mod matcher;
pub mod normalize;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::ParserConfig;
use crate::models::Question;

pub use cache::{CACHE_FORMAT_VERSION, CacheEntry, CacheError, QuestionCache};
pub use extract::{PagedDocument, PdfDocument};
pub use fingerprint::fingerprint;
pub use matcher::{MatchRecord, find_questions};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open document {path}: {reason}")]
    Open { path: PathBuf, reason: String },
    #[error("cannot extract text from page {page}: {reason}")]
    Page { page: u32, reason: String },
    #[error("cannot start extraction workers: {0}")]
    WorkerPool(String),
    #[error("cannot write question cache: {0}")]
    Cache(#[from] CacheError),
}

/// Questions produced for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub fingerprint: String,
    pub questions: Vec<Question>,
    pub from_cache: bool,
}

pub struct QuestionParser {
    cache: QuestionCache,
    workers: usize,
}

impl QuestionParser {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            cache: QuestionCache::new(&config.cache_dir, config.cache_prefix.clone()),
            workers: config.workers,
        }
    }

    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    /// Load the questions of the PDF at `path`, from cache when possible.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParseOutcome, ParseError> {
        self.parse_with(path, |p| PdfDocument::open(p))
    }

    /// Same as [`parse_file`](Self::parse_file) with a custom document opener.
    pub fn parse_with<P, D, F>(&self, path: P, open: F) -> Result<ParseOutcome, ParseError>
    where
        P: AsRef<Path>,
        D: PagedDocument,
        F: FnOnce(&Path) -> Result<D, ParseError>,
    {
        let path = path.as_ref();
        let fingerprint = fingerprint(path).map_err(|source| ParseError::Source {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(questions) = self.cache.load(&fingerprint) {
            info!(
                "Loaded {} questions for {} from cache",
                questions.len(),
                path.display()
            );
            return Ok(ParseOutcome {
                fingerprint,
                questions,
                from_cache: true,
            });
        }

        let text = match open(path).and_then(|doc| extract::extract_text(&doc, self.workers)) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to extract text from {}: {}", path.display(), e);
                return Ok(ParseOutcome {
                    fingerprint,
                    questions: Vec::new(),
                    from_cache: false,
                });
            }
        };

        let questions = questions_from_text(&text);
        info!("Parsed {} questions from {}", questions.len(), path.display());

        self.cache.save(&fingerprint, &questions)?;
        Ok(ParseOutcome {
            fingerprint,
            questions,
            from_cache: false,
        })
    }
}

/// Match, normalize and classify every question block in `text`.
///
/// Malformed records are logged and dropped.
pub fn questions_from_text(text: &str) -> Vec<Question> {
    find_questions(text)
        .iter()
        .filter_map(|record| match normalize::build_question(record) {
            Ok(question) => Some(question),
            Err(e) => {
                warn!("Dropping malformed question: {}", e);
                None
            }
        })
        .collect()
}
