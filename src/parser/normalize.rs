//! Turns raw match records into validated questions.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Question, QuestionError};

use super::classify::{classify_difficulty, classify_topic};
use super::matcher::MatchRecord;

const MOST_VOTED: &str = "Most Voted";

static OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-E]\. ").expect("option marker pattern is valid"));

/// Split an options block into one string per lettered option.
pub fn split_options(block: &str) -> Vec<String> {
    let markers: Vec<_> = OPTION_MARKER.find_iter(block).collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(block.len(), |next| next.start());
            block[marker.end()..end]
                .replace(MOST_VOTED, "")
                .trim()
                .to_string()
        })
        .collect()
}

/// Convert answer letters to zero-based option indices.
///
/// Anything outside A to E is ignored.
pub fn answer_indices(letters: &str) -> BTreeSet<usize> {
    letters
        .chars()
        .filter(|c| ('A'..='E').contains(c))
        .map(|c| c as usize - 'A' as usize)
        .collect()
}

/// Build a classified question from a match record.
///
/// Answers pointing past the last option are dropped; a record left with no
/// valid answer is rejected.
pub fn build_question(record: &MatchRecord) -> Result<Question, QuestionError> {
    let options = split_options(&record.options_block);
    let answers: BTreeSet<usize> = answer_indices(&record.answer_letters)
        .into_iter()
        .filter(|&index| index < options.len())
        .collect();

    let topic = classify_topic(&record.body);
    let difficulty = classify_difficulty(&record.body, options.len());

    Question::new(
        record.number,
        record.body.trim(),
        options,
        answers,
        record.explanation.clone().unwrap_or_default(),
        topic,
        difficulty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Topic};

    fn record(options_block: &str, answer_letters: &str) -> MatchRecord {
        MatchRecord {
            number: 1,
            body: "What is S3 used for?".to_string(),
            options_block: options_block.to_string(),
            answer_letters: answer_letters.to_string(),
            explanation: None,
        }
    }

    #[test]
    fn test_split_options_strips_most_voted() {
        let options = split_options("A. Compute\nB. Object storage Most Voted\nC. Networking\n");
        assert_eq!(options, vec!["Compute", "Object storage", "Networking"]);
    }

    #[test]
    fn test_split_options_keeps_wrapped_lines() {
        let options = split_options("A. Use an S3 bucket with\nversioning enabled\nB. Use EBS\n");
        assert_eq!(options, vec!["Use an S3 bucket with\nversioning enabled", "Use EBS"]);
    }

    #[test]
    fn test_answer_indices_ignore_unknown_letters() {
        assert_eq!(answer_indices("B"), BTreeSet::from([1]));
        assert_eq!(answer_indices("ACE"), BTreeSet::from([0, 2, 4]));
        assert_eq!(answer_indices("BF"), BTreeSet::from([1]));
        assert!(answer_indices("XYZ").is_empty());
    }

    #[test]
    fn test_build_question_concrete_scenario() {
        let question =
            build_question(&record("A. Compute\nB. Object storage\nC. Networking\n", "B")).unwrap();
        assert_eq!(question.id, 1);
        assert_eq!(question.options, vec!["Compute", "Object storage", "Networking"]);
        assert_eq!(question.correct_answers, BTreeSet::from([1]));
        assert_eq!(question.topic, Topic::Storage);
        assert_eq!(question.difficulty, Difficulty::Easy);
        assert_eq!(question.explanation, "");
    }

    #[test]
    fn test_build_question_drops_letter_past_last_option() {
        let question = build_question(&record("A. a\nB. b\nC. c\nD. d\nE. e\n", "BF")).unwrap();
        assert_eq!(question.correct_answers, BTreeSet::from([1]));

        let truncated = build_question(&record("A. a\nB. b\nC. c\n", "AD")).unwrap();
        assert_eq!(truncated.correct_answers, BTreeSet::from([0]));
    }

    #[test]
    fn test_build_question_rejects_record_without_valid_answer() {
        let err = build_question(&record("A. a\nB. b\n", "D")).unwrap_err();
        assert_eq!(err, QuestionError::NoCorrectAnswer { id: 1 });
    }
}
