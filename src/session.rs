//! Quiz session state.
//!
//! A session owns its own copy of the selected questions; every change goes
//! through the transition methods below.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};
use thiserror::Error;

use crate::config::QuizConfig;
use crate::models::{Difficulty, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    Practice,
    Exam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionOrder {
    #[default]
    Random,
    Sequential,
    Reverse,
}

impl QuestionOrder {
    pub fn next(self) -> Self {
        match self {
            QuestionOrder::Random => QuestionOrder::Sequential,
            QuestionOrder::Sequential => QuestionOrder::Reverse,
            QuestionOrder::Reverse => QuestionOrder::Random,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionOrder::Random => "Random",
            QuestionOrder::Sequential => "Sequential (first to last)",
            QuestionOrder::Reverse => "Reverse (last to first)",
        }
    }
}

/// How a session picks and orders its questions.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub mode: QuizMode,
    /// Only used in practice mode; `None` keeps every difficulty.
    pub difficulty: Option<Difficulty>,
    pub order: QuestionOrder,
    pub exam_question_count: usize,
}

impl SessionOptions {
    pub fn practice(difficulty: Option<Difficulty>, order: QuestionOrder) -> Self {
        Self {
            mode: QuizMode::Practice,
            difficulty,
            order,
            exam_question_count: 0,
        }
    }

    pub fn exam(exam_question_count: usize, order: QuestionOrder) -> Self {
        Self {
            mode: QuizMode::Exam,
            difficulty: None,
            order,
            exam_question_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no questions match the current filter")]
    NoQuestions,
    #[error("exam mode needs {needed} questions but only {available} are loaded")]
    NotEnoughQuestions { needed: usize, available: usize },
}

/// What the user is told after submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answers: BTreeSet<usize>,
    pub explanation: String,
    pub time_taken: Duration,
}

/// One submitted answer.
#[derive(Debug, Clone)]
pub struct AnsweredQuestion {
    pub index: usize,
    pub selection: BTreeSet<usize>,
    pub is_correct: bool,
    pub time_taken: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub answered: usize,
    pub percentage: f64,
    pub total_time: Duration,
    pub average_time: Duration,
    pub wrong_count: usize,
    pub is_exam: bool,
    pub passed: bool,
}

pub struct QuizSession {
    mode: QuizMode,
    questions: Vec<Question>,
    current: usize,
    submitted: bool,
    score: usize,
    answers: Vec<AnsweredQuestion>,
    passing_score: f64,
    started_at: Instant,
    question_started_at: Instant,
}

impl QuizSession {
    /// Pick questions from `pool` according to `options` and start a session.
    pub fn start<R: Rng + ?Sized>(
        pool: &[Question],
        options: &SessionOptions,
        config: &QuizConfig,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let mut questions: Vec<Question> = match options.mode {
            QuizMode::Exam => {
                let needed = options.exam_question_count;
                if needed == 0 || pool.len() < needed {
                    return Err(SessionError::NotEnoughQuestions {
                        needed,
                        available: pool.len(),
                    });
                }
                pool.iter().cloned().choose_multiple(rng, needed)
            }
            QuizMode::Practice => pool
                .iter()
                .filter(|q| options.difficulty.is_none_or(|d| q.difficulty == d))
                .cloned()
                .collect(),
        };

        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        match options.order {
            QuestionOrder::Random => questions.shuffle(rng),
            QuestionOrder::Sequential => questions.sort_by_key(|q| q.id),
            QuestionOrder::Reverse => questions.sort_by_key(|q| std::cmp::Reverse(q.id)),
        }

        let passing_score = match options.mode {
            QuizMode::Exam => config.exam_passing_score,
            QuizMode::Practice => config.practice_passing_score,
        };
        let now = Instant::now();

        Ok(Self {
            mode: options.mode,
            questions,
            current: 0,
            submitted: false,
            score: 0,
            answers: Vec::new(),
            passing_score,
            started_at: now,
            question_started_at: now,
        })
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// The answer recorded for the question at `index`, if any.
    pub fn answer_for(&self, index: usize) -> Option<&AnsweredQuestion> {
        self.answers.iter().rev().find(|a| a.index == index)
    }

    /// Check `selection` against the current question.
    ///
    /// Returns `None` when the current question was already answered or the
    /// session is over.
    pub fn submit_answer(&mut self, selection: BTreeSet<usize>) -> Option<AnswerFeedback> {
        if self.submitted {
            return None;
        }
        let index = self.current;
        let question = self.questions.get_mut(index)?;

        let is_correct = question.is_correct(&selection);
        let time_taken = self.question_started_at.elapsed();

        question.times_answered += 1;
        if is_correct {
            question.times_correct += 1;
            self.score += 1;
        }
        let feedback = AnswerFeedback {
            is_correct,
            correct_answers: question.correct_answers.clone(),
            explanation: question.explanation.clone(),
            time_taken,
        };

        self.answers.push(AnsweredQuestion {
            index,
            selection,
            is_correct,
            time_taken,
        });
        self.submitted = true;
        Some(feedback)
    }

    /// Move to the next question. Returns false once past the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.current += 1;
        self.submitted = self.answer_for(self.current).is_some();
        self.question_started_at = Instant::now();
        !self.is_finished()
    }

    /// Step back one question. Returns false at the first question.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.submitted = self.answer_for(self.current).is_some();
        self.question_started_at = Instant::now();
        true
    }

    /// Start over with the same questions.
    pub fn reset(&mut self) {
        self.current = 0;
        self.submitted = false;
        self.score = 0;
        self.answers.clear();
        self.started_at = Instant::now();
        self.question_started_at = self.started_at;
    }

    /// A wrong option to eliminate for the current question.
    ///
    /// Only offered in practice mode, before answering, for questions with a
    /// single correct answer.
    pub fn hint<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.submitted || self.mode == QuizMode::Exam {
            return None;
        }
        let question = self.current_question()?;
        if question.is_multiple_choice() {
            return None;
        }
        (0..question.options.len())
            .filter(|i| !question.correct_answers.contains(i))
            .choose(rng)
    }

    pub fn results(&self) -> QuizResults {
        let total = self.questions.len();
        let answered = self.answers.len();
        let percentage = if total > 0 {
            (self.score as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let answer_time: Duration = self.answers.iter().map(|a| a.time_taken).sum();
        let average_time = if answered > 0 {
            answer_time / answered as u32
        } else {
            Duration::ZERO
        };

        QuizResults {
            score: self.score,
            total,
            answered,
            percentage,
            total_time: self.started_at.elapsed(),
            average_time,
            wrong_count: self.answers.iter().filter(|a| !a.is_correct).count(),
            is_exam: self.mode == QuizMode::Exam,
            passed: percentage >= self.passing_score,
        }
    }
}
