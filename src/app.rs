use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::QuizConfig;
use crate::data::{LoadHandle, LoadOutcome, LoadResult, QuestionSource};
use crate::models::{AppState, Difficulty, Question};
use crate::session::{AnswerFeedback, QuestionOrder, QuizMode, QuizSession, SessionOptions};

pub struct App {
    pub state: AppState,
    config: QuizConfig,
    questions: Vec<Question>,
    source_path: Option<PathBuf>,
    source: Option<QuestionSource>,
    loader: Option<LoadHandle>,
    session: Option<QuizSession>,
    difficulty: Option<Difficulty>,
    order: QuestionOrder,
    selected_option: usize,
    selection: BTreeSet<usize>,
    feedback: Option<AnswerFeedback>,
    eliminated: Option<usize>,
    status: Option<String>,
    result_scroll: usize,
    tick: usize,
}

impl App {
    fn empty(state: AppState, config: QuizConfig) -> Self {
        Self {
            state,
            config,
            questions: Vec::new(),
            source_path: None,
            source: None,
            loader: None,
            session: None,
            difficulty: None,
            order: QuestionOrder::default(),
            selected_option: 0,
            selection: BTreeSet::new(),
            feedback: None,
            eliminated: None,
            status: None,
            result_scroll: 0,
            tick: 0,
        }
    }

    /// An app over questions that are already in memory.
    pub fn with_questions(questions: Vec<Question>, config: QuizConfig) -> Self {
        let mut app = Self::empty(AppState::Welcome, config);
        app.questions = questions;
        app
    }

    /// An app that waits for a background load to finish.
    pub fn loading(handle: LoadHandle, config: QuizConfig) -> Self {
        let mut app = Self::empty(AppState::Loading, config);
        app.source_path = Some(handle.path().to_path_buf());
        app.loader = Some(handle);
        app
    }

    // ── Loading ─────────────────────────────────────────────────

    /// Check the background loader and apply its result if it has one.
    pub fn poll_loader(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        let Some(result) = self.loader.as_ref().and_then(|handle| handle.try_recv()) else {
            return;
        };
        self.loader = None;
        self.apply_load_result(result);
    }

    pub fn apply_load_result(&mut self, result: LoadResult) {
        match result {
            Ok(LoadOutcome {
                path,
                questions,
                source,
            }) => {
                info!("{} questions ready from {}", questions.len(), path.display());
                self.status = if questions.is_empty() {
                    Some(format!("No questions found in {}", path.display()))
                } else {
                    None
                };
                self.questions = questions;
                self.source_path = Some(path);
                self.source = Some(source);
                self.state = AppState::Welcome;
            }
            Err(e) => {
                warn!("Question load failed: {}", e);
                self.status = Some(e.to_string());
                self.state = AppState::Failed;
            }
        }
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn source(&self) -> Option<QuestionSource> {
        self.source
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref()?.current_question()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn order(&self) -> QuestionOrder {
        self.order
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    pub fn eliminated(&self) -> Option<usize> {
        self.eliminated
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    // ── Welcome ─────────────────────────────────────────────────

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = match self.difficulty {
            None => Some(Difficulty::Easy),
            Some(Difficulty::Easy) => Some(Difficulty::Medium),
            Some(Difficulty::Medium) => Some(Difficulty::Hard),
            Some(Difficulty::Hard) => None,
        };
    }

    pub fn cycle_order(&mut self) {
        self.order = self.order.next();
    }

    pub fn start_quiz(&mut self, mode: QuizMode) {
        let options = match mode {
            QuizMode::Practice => SessionOptions::practice(self.difficulty, self.order),
            QuizMode::Exam => SessionOptions::exam(self.config.exam_question_count, self.order),
        };

        match QuizSession::start(&self.questions, &options, &self.config, &mut rand::thread_rng()) {
            Ok(session) => {
                info!(
                    "Starting {:?} session with {} questions",
                    mode,
                    session.total_questions()
                );
                self.session = Some(session);
                self.status = None;
                self.clear_question_state();
                self.state = AppState::Quiz;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    // ── Quiz ────────────────────────────────────────────────────

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options.len())
    }

    fn clear_question_state(&mut self) {
        self.selected_option = 0;
        self.selection.clear();
        self.feedback = None;
        self.eliminated = None;
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Add or remove the highlighted option from the selection.
    ///
    /// Single-answer questions keep at most one option selected.
    pub fn toggle_option(&mut self) {
        if self.feedback.is_some() {
            return;
        }
        let multiple = self.current_question().is_some_and(|q| q.is_multiple_choice());
        let option = self.selected_option;
        if !self.selection.remove(&option) {
            if !multiple {
                self.selection.clear();
            }
            self.selection.insert(option);
        }
    }

    /// Submit the selection, or move on if the answer is already shown.
    pub fn submit_answer(&mut self) {
        if self.feedback.is_some() {
            self.next_question();
            return;
        }
        if self.selection.is_empty() {
            self.selection.insert(self.selected_option);
        }
        let selection = self.selection.clone();
        if let Some(session) = self.session.as_mut() {
            self.feedback = session.submit_answer(selection);
        }
    }

    pub fn next_question(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.advance() {
            self.restore_question_state();
        } else {
            self.finish_quiz();
        }
    }

    pub fn previous_question(&mut self) {
        let moved = self.session.as_mut().is_some_and(|s| s.previous());
        if moved {
            self.restore_question_state();
        }
    }

    /// Reset per-question UI state, showing the earlier answer if there is one.
    fn restore_question_state(&mut self) {
        self.clear_question_state();
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let index = session.current_index();
        if let (Some(answer), Some(question)) = (session.answer_for(index), session.current_question()) {
            self.selection = answer.selection.clone();
            self.feedback = Some(AnswerFeedback {
                is_correct: answer.is_correct,
                correct_answers: question.correct_answers.clone(),
                explanation: question.explanation.clone(),
                time_taken: answer.time_taken,
            });
        }
    }

    pub fn request_hint(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.eliminated = session.hint(&mut rand::thread_rng());
            if let Some(option) = self.eliminated {
                self.selection.remove(&option);
            }
        }
    }

    pub fn finish_quiz(&mut self) {
        self.result_scroll = 0;
        self.state = AppState::Result;
    }

    pub fn calculate_score(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.score())
    }

    // ── Result ──────────────────────────────────────────────────

    pub fn scroll_results_down(&mut self) {
        let answered = self.session.as_ref().map_or(0, |s| s.answers().len());
        if self.result_scroll + 1 < answered {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Drop the finished session and go back to the start screen.
    pub fn restart(&mut self) {
        self.session = None;
        self.clear_question_state();
        self.result_scroll = 0;
        self.state = AppState::Welcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadError;
    use crate::models::Topic;

    fn question(id: u32, answers: &[usize]) -> Question {
        Question::new(
            id,
            format!("Question {}", id),
            vec!["a".into(), "b".into(), "c".into()],
            answers.iter().copied().collect(),
            "",
            Topic::General,
            Difficulty::Easy,
        )
        .unwrap()
    }

    fn sequential_app(questions: Vec<Question>) -> App {
        let mut app = App::with_questions(questions, QuizConfig::default());
        app.cycle_order();
        assert_eq!(app.order(), QuestionOrder::Sequential);
        app
    }

    #[test]
    fn test_apply_load_result() {
        let mut app = App::with_questions(Vec::new(), QuizConfig::default());
        app.state = AppState::Loading;
        app.apply_load_result(Ok(LoadOutcome {
            path: PathBuf::from("dump.pdf"),
            questions: vec![question(1, &[0])],
            source: QuestionSource::Cache,
        }));
        assert_eq!(app.state, AppState::Welcome);
        assert_eq!(app.questions().len(), 1);
        assert_eq!(app.source(), Some(QuestionSource::Cache));
        assert!(app.status().is_none());

        app.apply_load_result(Err(LoadError::Empty(PathBuf::from("bank.json"))));
        assert_eq!(app.state, AppState::Failed);
        assert!(app.status().unwrap().contains("bank.json"));
    }

    #[test]
    fn test_empty_document_cannot_start() {
        let mut app = App::with_questions(Vec::new(), QuizConfig::default());
        app.apply_load_result(Ok(LoadOutcome {
            path: PathBuf::from("empty.pdf"),
            questions: Vec::new(),
            source: QuestionSource::Parsed,
        }));
        assert!(app.status().unwrap().contains("No questions"));

        app.start_quiz(QuizMode::Practice);
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_single_answer_selection_replaces() {
        let mut app = sequential_app(vec![question(1, &[1])]);
        app.start_quiz(QuizMode::Practice);
        app.toggle_option();
        app.select_next_option();
        app.toggle_option();
        assert_eq!(app.selection(), &BTreeSet::from([1]));

        app.submit_answer();
        assert!(app.feedback().unwrap().is_correct);
        assert_eq!(app.calculate_score(), 1);

        app.submit_answer();
        assert_eq!(app.state, AppState::Result);
    }

    #[test]
    fn test_multiple_answer_selection_accumulates() {
        let mut app = sequential_app(vec![question(1, &[0, 2])]);
        app.start_quiz(QuizMode::Practice);
        app.toggle_option();
        app.select_previous_option();
        assert_eq!(app.selected_option(), 2);
        app.toggle_option();
        assert_eq!(app.selection(), &BTreeSet::from([0, 2]));
        app.submit_answer();
        assert!(app.feedback().unwrap().is_correct);
    }

    #[test]
    fn test_previous_question_shows_earlier_answer() {
        let mut app = sequential_app(vec![question(1, &[0]), question(2, &[1])]);
        app.start_quiz(QuizMode::Practice);
        app.submit_answer();
        app.next_question();
        assert!(app.feedback().is_none());

        app.previous_question();
        assert_eq!(app.session().unwrap().current_index(), 0);
        assert_eq!(app.selection(), &BTreeSet::from([0]));
        assert!(app.feedback().unwrap().is_correct);
    }

    #[test]
    fn test_exam_needs_enough_questions() {
        let mut app = App::with_questions(vec![question(1, &[0])], QuizConfig::default());
        app.start_quiz(QuizMode::Exam);
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.status().unwrap().contains("65"));
    }

    #[test]
    fn test_restart_returns_to_welcome() {
        let mut app = sequential_app(vec![question(1, &[0])]);
        app.start_quiz(QuizMode::Practice);
        app.finish_quiz();
        assert_eq!(app.state, AppState::Result);
        app.restart();
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.session().is_none());
        assert_eq!(app.questions().len(), 1);
    }
}
