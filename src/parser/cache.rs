//! On-disk cache of parsed question lists, keyed by document fingerprint.
//!
//! Layout:
//! ```text
//! <cache dir>/
//!   quiz_cache_1a2b3c4d.json   <- {version, timestamp, questions}
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Question;

/// Format version written into every entry. Entries with any other
/// version are ignored.
pub const CACHE_FORMAT_VERSION: &str = "2.0";

/// Default file name prefix for cache entries.
pub const DEFAULT_CACHE_PREFIX: &str = "quiz_cache_";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persisted parse result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub questions: Vec<Question>,
}

pub struct QuestionCache {
    dir: PathBuf,
    prefix: String,
}

impl QuestionCache {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `fingerprint`.
    pub fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, fingerprint))
    }

    /// Cached questions for `fingerprint`, or `None` on any kind of miss.
    pub fn load(&self, fingerprint: &str) -> Option<Vec<Question>> {
        let path = self.entry_path(fingerprint);
        if !path.exists() {
            debug!("Cache miss for {}: no entry", fingerprint);
            return None;
        }

        match read_entry(&path) {
            Ok(Some(entry)) => Some(entry.questions),
            Ok(None) => {
                debug!("Cache miss for {}: stale format version", fingerprint);
                None
            }
            Err(e) => {
                debug!("Cache miss for {}: {}", fingerprint, e);
                None
            }
        }
    }

    /// Write a fresh entry for `fingerprint`, replacing any previous one.
    pub fn save(&self, fingerprint: &str, questions: &[Question]) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir)?;

        let entry = CacheEntry {
            version: CACHE_FORMAT_VERSION.to_string(),
            timestamp: Utc::now(),
            questions: questions.to_vec(),
        };
        let json = serde_json::to_string_pretty(&entry)?;

        let path = self.entry_path(fingerprint);
        let tmp = self
            .dir
            .join(format!(".{}{}.{}.tmp", self.prefix, fingerprint, uuid::Uuid::new_v4()));
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!("Cached {} questions at {}", questions.len(), path.display());
        Ok(path)
    }

    /// Remove every entry with this cache's prefix. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&self.prefix) && name.ends_with(".json") {
                match fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Failed to remove cache entry {}: {}", name, e),
                }
            }
        }
        Ok(removed)
    }
}

/// Read an entry, returning `Ok(None)` when its version is not current.
fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
    let json = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    if value.get("version").and_then(|v| v.as_str()) != Some(CACHE_FORMAT_VERSION) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::models::{Difficulty, Topic};

    fn sample_questions() -> Vec<Question> {
        vec![
            Question::new(
                1,
                "What is S3 used for?",
                vec!["Compute".into(), "Object storage".into(), "Networking".into()],
                BTreeSet::from([1]),
                "",
                Topic::Storage,
                Difficulty::Easy,
            )
            .unwrap(),
            Question::new(
                2,
                "Which TWO services are serverless?",
                vec!["Lambda".into(), "EC2".into(), "Fargate".into(), "RDS".into()],
                BTreeSet::from([0, 2]),
                "Lambda and Fargate need no servers.",
                Topic::Compute,
                Difficulty::Easy,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path().join("cache"), DEFAULT_CACHE_PREFIX);
        let questions = sample_questions();

        let path = cache.save("1a2b3c4d", &questions).unwrap();
        assert_eq!(path, tmp.path().join("cache").join("quiz_cache_1a2b3c4d.json"));
        assert_eq!(cache.load("1a2b3c4d"), Some(questions));
    }

    #[test]
    fn test_saved_entry_format() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path(), DEFAULT_CACHE_PREFIX);
        let path = cache.save("abcdef01", &sample_questions()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["version"], "2.0");
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
        assert_eq!(value["questions"][0]["question"], "What is S3 used for?");
        assert_eq!(value["questions"][1]["correct_answers"], serde_json::json!([0, 2]));
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path(), DEFAULT_CACHE_PREFIX);
        cache.save("abcdef01", &sample_questions()).unwrap();
        cache.save("abcdef01", &sample_questions()[..1]).unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["quiz_cache_abcdef01.json".to_string()]);
        assert_eq!(cache.load("abcdef01").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_entry_is_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path(), DEFAULT_CACHE_PREFIX);
        assert!(cache.load("00000000").is_none());
    }

    #[test]
    fn test_version_mismatch_is_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path(), DEFAULT_CACHE_PREFIX);
        let stale = serde_json::json!({
            "version": "1.0",
            "timestamp": "2024-01-01T00:00:00Z",
            "questions": []
        });
        fs::write(cache.entry_path("deadbeef"), stale.to_string()).unwrap();
        assert!(cache.load("deadbeef").is_none());
    }

    #[test]
    fn test_malformed_entry_is_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path(), DEFAULT_CACHE_PREFIX);
        fs::write(cache.entry_path("deadbeef"), "{ not json").unwrap();
        assert!(cache.load("deadbeef").is_none());

        let invalid_question = serde_json::json!({
            "version": "2.0",
            "timestamp": "2024-01-01T00:00:00Z",
            "questions": [{"id": 1, "question": "q", "options": ["a"], "correct_answers": [3]}]
        });
        fs::write(cache.entry_path("deadbeef"), invalid_question.to_string()).unwrap();
        assert!(cache.load("deadbeef").is_none());
    }

    #[test]
    fn test_clear_removes_only_prefixed_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path(), DEFAULT_CACHE_PREFIX);
        cache.save("aaaaaaaa", &sample_questions()).unwrap();
        cache.save("bbbbbbbb", &sample_questions()).unwrap();
        fs::write(tmp.path().join("quiz_stats.json"), "{}").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.load("aaaaaaaa").is_none());
        assert!(tmp.path().join("quiz_stats.json").exists());
    }

    #[test]
    fn test_clear_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = QuestionCache::new(tmp.path().join("nope"), DEFAULT_CACHE_PREFIX);
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
