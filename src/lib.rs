//! # pdf-quiz
//!
//! Turns PDF exam dumps into a terminal quiz.
//!
//! Documents go through a fingerprint-and-cache pipeline ([`parser`]): page
//! text is extracted in parallel, question blocks are matched and
//! normalized, then tagged with a topic and difficulty. Results are cached
//! per document fingerprint so a second open is instant.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdf_quiz::{ParserConfig, Quiz, QuizConfig, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Parse in the background while the loading screen is shown
//!     let quiz = Quiz::load("dump.pdf", ParserConfig::default(), QuizConfig::default());
//!
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
pub mod logging;
mod models;
pub mod parser;
pub mod session;
pub mod terminal;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;

pub use app::App;
pub use config::{ParserConfig, QuizConfig};
pub use data::{
    LoadError, LoadHandle, LoadOutcome, QuestionSource, load_questions, load_questions_from_json,
    spawn_load,
};
pub use models::{AppState, Difficulty, Question, QuestionError, Topic};
pub use parser::{ParseError, ParseOutcome, QuestionParser};
pub use session::QuizMode;

/// How long the event loop waits for a key before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a new quiz from questions already in memory.
    pub fn new(questions: Vec<Question>, config: QuizConfig) -> Self {
        Self {
            app: App::with_questions(questions, config),
        }
    }

    /// Start loading `path` in the background.
    ///
    /// The quiz opens on a loading screen and switches to the start screen
    /// once the document is parsed (or served from the cache).
    pub fn load(path: impl Into<PathBuf>, parser: ParserConfig, config: QuizConfig) -> Self {
        Self {
            app: App::loading(spawn_load(path, parser), config),
        }
    }

    /// Load a quiz from a JSON question bank.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pdf_quiz::{Quiz, QuizConfig};
    ///
    /// let quiz = Quiz::from_json("questions.json", QuizConfig::default()).expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P, config: QuizConfig) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Ok(Self::new(questions, config))
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app);
        terminal::restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.poll_loader();
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state {
        AppState::Loading | AppState::Failed => is_quit(key),
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn is_quit(key: KeyCode) -> bool {
    matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => app.start_quiz(QuizMode::Practice),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_quiz(QuizMode::Exam),
        KeyCode::Char('d') | KeyCode::Char('D') => app.cycle_difficulty(),
        KeyCode::Char('o') | KeyCode::Char('O') => app.cycle_order(),
        _ => return is_quit(key),
    }
    false
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(' ') => app.toggle_option(),
        KeyCode::Enter => app.submit_answer(),
        KeyCode::Right | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('h') => app.request_hint(),
        KeyCode::Char('f') => app.finish_quiz(),
        _ => return is_quit(key),
    }
    false
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        _ => return is_quit(key),
    }
    false
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn bank() -> Vec<Question> {
        (1..=3)
            .map(|id| {
                Question::new(
                    id,
                    format!("Question {}", id),
                    vec!["a".into(), "b".into(), "c".into()],
                    BTreeSet::from([0]),
                    String::new(),
                    Topic::General,
                    Difficulty::Easy,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_welcome_keys() {
        let mut app = App::with_questions(bank(), QuizConfig::default());
        assert!(!handle_input(&mut app, KeyCode::Char('d')));
        assert_eq!(app.difficulty(), Some(Difficulty::Easy));
        assert!(!handle_input(&mut app, KeyCode::Enter));
        assert_eq!(app.state, AppState::Quiz);
    }

    #[test]
    fn test_quiz_flow_to_results() {
        let mut app = App::with_questions(bank(), QuizConfig::default());
        handle_input(&mut app, KeyCode::Enter);
        for _ in 0..3 {
            handle_input(&mut app, KeyCode::Char(' '));
            handle_input(&mut app, KeyCode::Enter);
            handle_input(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.calculate_score(), 3);

        assert!(!handle_input(&mut app, KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Welcome);
    }

    #[test]
    fn test_quit_from_every_screen() {
        let mut app = App::with_questions(bank(), QuizConfig::default());
        assert!(handle_input(&mut app, KeyCode::Char('q')));
        app.start_quiz(QuizMode::Practice);
        assert!(handle_input(&mut app, KeyCode::Esc));
        app.finish_quiz();
        assert!(handle_input(&mut app, KeyCode::Char('Q')));
    }

    #[test]
    fn test_exam_needs_enough_questions() {
        let mut app = App::with_questions(bank(), QuizConfig::default());
        handle_input(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.status().is_some());
    }
}
