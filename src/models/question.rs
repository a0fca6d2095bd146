use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest number of options a question can carry (letters A to E).
pub const MAX_OPTIONS: usize = 5;

/// Reasons a question record is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question {id} has no options")]
    NoOptions { id: u32 },
    #[error("question {id} has {count} options, at most {MAX_OPTIONS} are allowed")]
    TooManyOptions { id: u32, count: usize },
    #[error("question {id} has no correct answer")]
    NoCorrectAnswer { id: u32 },
    #[error("question {id} marks option {index} as correct but only has {count} options")]
    AnswerOutOfRange { id: u32, index: usize, count: usize },
}

/// Subject area a question belongs to.
///
/// The declaration order is the classifier's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    Security,
    Storage,
    Compute,
    Database,
    Networking,
    Monitoring,
    Management,
    General,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Security,
        Topic::Storage,
        Topic::Compute,
        Topic::Database,
        Topic::Networking,
        Topic::Monitoring,
        Topic::Management,
        Topic::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Security => "Security",
            Topic::Storage => "Storage",
            Topic::Compute => "Compute",
            Topic::Database => "Database",
            Topic::Networking => "Networking",
            Topic::Monitoring => "Monitoring",
            Topic::Management => "Management",
            Topic::General => "General",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single multiple-choice question.
///
/// Instances are only ever built through [`Question::new`] (deserialization
/// included), so `correct_answers` is always non-empty and in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    /// Ordinal of the question in its source document.
    pub id: u32,
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub correct_answers: BTreeSet<usize>,
    pub explanation: String,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub times_answered: u32,
    pub times_correct: u32,
}

impl Question {
    pub fn new(
        id: u32,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answers: BTreeSet<usize>,
        explanation: impl Into<String>,
        topic: Topic,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let count = options.len();
        if count == 0 {
            return Err(QuestionError::NoOptions { id });
        }
        if count > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions { id, count });
        }
        if correct_answers.is_empty() {
            return Err(QuestionError::NoCorrectAnswer { id });
        }
        if let Some(&index) = correct_answers.iter().find(|&&index| index >= count) {
            return Err(QuestionError::AnswerOutOfRange { id, index, count });
        }

        Ok(Self {
            id,
            text: text.into(),
            options,
            correct_answers,
            explanation: explanation.into(),
            topic,
            difficulty,
            times_answered: 0,
            times_correct: 0,
        })
    }

    /// True when the selection is exactly the set of correct answers.
    pub fn is_correct(&self, selection: &BTreeSet<usize>) -> bool {
        *selection == self.correct_answers
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.correct_answers.len() > 1
    }

    /// Letter shown next to the option at `index` (0 is 'A').
    pub fn option_label(index: usize) -> char {
        (b'A' + index as u8) as char
    }

    /// Correct answers rendered as letters, e.g. "BD".
    pub fn answer_letters(&self) -> String {
        self.correct_answers
            .iter()
            .map(|&index| Self::option_label(index))
            .collect()
    }
}

/// Unvalidated wire shape of a question, used only during deserialization.
#[derive(Deserialize)]
struct QuestionRecord {
    id: u32,
    question: String,
    options: Vec<String>,
    correct_answers: BTreeSet<usize>,
    #[serde(default)]
    explanation: String,
    #[serde(default = "default_topic")]
    topic: Topic,
    #[serde(default = "default_difficulty")]
    difficulty: Difficulty,
    #[serde(default)]
    times_answered: u32,
    #[serde(default)]
    times_correct: u32,
}

fn default_topic() -> Topic {
    Topic::General
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let mut question = Question::new(
            record.id,
            record.question,
            record.options,
            record.correct_answers,
            record.explanation,
            record.topic,
            record.difficulty,
        )?;
        question.times_answered = record.times_answered;
        question.times_correct = record.times_correct;
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_validates_answers() {
        let ok = Question::new(
            1,
            "What is S3 used for?",
            options(&["Compute", "Object storage"]),
            BTreeSet::from([1]),
            "",
            Topic::Storage,
            Difficulty::Easy,
        );
        assert!(ok.is_ok());

        let empty = Question::new(
            2,
            "q",
            options(&["a", "b"]),
            BTreeSet::new(),
            "",
            Topic::General,
            Difficulty::Easy,
        );
        assert_eq!(empty, Err(QuestionError::NoCorrectAnswer { id: 2 }));

        let out_of_range = Question::new(
            3,
            "q",
            options(&["a", "b"]),
            BTreeSet::from([0, 2]),
            "",
            Topic::General,
            Difficulty::Easy,
        );
        assert_eq!(
            out_of_range,
            Err(QuestionError::AnswerOutOfRange {
                id: 3,
                index: 2,
                count: 2
            })
        );
    }

    #[test]
    fn test_new_rejects_option_count() {
        let none = Question::new(
            4,
            "q",
            Vec::new(),
            BTreeSet::from([0]),
            "",
            Topic::General,
            Difficulty::Easy,
        );
        assert_eq!(none, Err(QuestionError::NoOptions { id: 4 }));

        let six = Question::new(
            5,
            "q",
            options(&["a", "b", "c", "d", "e", "f"]),
            BTreeSet::from([0]),
            "",
            Topic::General,
            Difficulty::Easy,
        );
        assert_eq!(six, Err(QuestionError::TooManyOptions { id: 5, count: 6 }));
    }

    #[test]
    fn test_serialization_uses_question_key() {
        let question = Question::new(
            7,
            "Which service stores objects?",
            options(&["EC2", "S3"]),
            BTreeSet::from([1]),
            "S3 is object storage.",
            Topic::Storage,
            Difficulty::Easy,
        )
        .unwrap();

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["question"], "Which service stores objects?");
        assert_eq!(json["correct_answers"], serde_json::json!([1]));
        assert_eq!(json["topic"], "Storage");
        assert_eq!(json["difficulty"], "Easy");
        assert_eq!(json["times_answered"], 0);
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_deserialization_rejects_out_of_range_answer() {
        let json = r#"{
            "id": 1,
            "question": "q",
            "options": ["a", "b"],
            "correct_answers": [4]
        }"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn test_deserialization_fills_defaults() {
        let json = r#"{
            "id": 9,
            "question": "q",
            "options": ["a", "b", "c"],
            "correct_answers": [2, 0]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.topic, Topic::General);
        assert_eq!(question.difficulty, Difficulty::Medium);
        assert_eq!(question.answer_letters(), "AC");
        assert!(question.is_multiple_choice());
        assert!(question.is_correct(&BTreeSet::from([0, 2])));
        assert!(!question.is_correct(&BTreeSet::from([0])));
    }
}
