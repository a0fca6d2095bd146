//! Recognizes question blocks in extracted document text.
//!
//! A block looks like:
//!
//! ```text
//! Question #12
//! Which service ...?
//! A. First option
//! B. Second option
//! Most Voted
//! Correct Answer: B
//! Explanation: optional free text
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static QUESTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Question #\d+\n").expect("question header pattern is valid")
});

static QUESTION_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\AQuestion #(\d+)\n(.*?)\n((?:[A-E]\. .*?\n)+)(?:Most Voted\n)?Correct Answer: ([A-Z]+)",
    )
    .expect("question block pattern is valid")
});

/// One structurally recognized question, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub number: u32,
    pub body: String,
    pub options_block: String,
    pub answer_letters: String,
    pub explanation: Option<String>,
}

/// Find every question block in `text`, in document order.
///
/// A header is a line of its own reading `Question #<n>`; mentions of other
/// questions inside a body do not start a new block. Headers that are not
/// followed by an options block and an answer line are skipped.
pub fn find_questions(text: &str) -> Vec<MatchRecord> {
    let text = text.replace("\r\n", "\n");
    let starts: Vec<usize> = QUESTION_HEADER.find_iter(&text).map(|m| m.start()).collect();

    let mut records = Vec::with_capacity(starts.len());
    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(text.len());
        match match_block(&text[start..end]) {
            Some(record) => records.push(record),
            None => debug!("Skipping unstructured question header at byte {}", start),
        }
    }
    records
}

fn match_block(block: &str) -> Option<MatchRecord> {
    let caps = QUESTION_BLOCK.captures(block)?;
    let number = caps[1].parse().ok()?;
    let whole = caps.get(0)?;

    Some(MatchRecord {
        number,
        body: caps[2].trim().to_string(),
        options_block: caps[3].to_string(),
        answer_letters: caps[4].to_string(),
        explanation: explanation_after(&block[whole.end()..]),
    })
}

/// Explanation text directly after the answer line, up to a blank line or
/// the end of the block.
fn explanation_after(rest: &str) -> Option<String> {
    let text = rest.strip_prefix("\nExplanation:")?.trim_start();
    let end = text.find("\n\n").unwrap_or(text.len());
    Some(text[..end].trim().to_string())
}
