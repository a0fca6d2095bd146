use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Question;
use crate::session::QuizMode;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(session), Some(question)) = (app.session(), app.current_question()) else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let progress = format!(
        "{}/{}  ·  score {}",
        session.current_index() + 1,
        session.total_questions(),
        session.score()
    );
    render_header(frame, chunks[0], question, session.mode(), progress);
    render_question_text(frame, chunks[1], question);
    render_options(frame, chunks[2], app, question);
    render_feedback(frame, chunks[3], app);
    render_controls(frame, chunks[4], session.mode());
}

fn render_header(frame: &mut Frame, area: Rect, question: &Question, mode: QuizMode, progress: String) {
    let mode = match mode {
        QuizMode::Practice => "PRACTICE",
        QuizMode::Exam => "EXAM",
    };
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let tags = Line::from(vec![
        Span::styled(mode, Style::default().fg(Color::Cyan).bold()),
        format!("  #{}  {}  ·  {}", question.id, question.topic, question.difficulty).fg(Color::DarkGray),
    ]);
    frame.render_widget(Paragraph::new(tags), halves[0]);

    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, question: &Question) {
    let mut lines: Vec<Line> = question.text.lines().map(Line::from).collect();
    if question.is_multiple_choice() {
        lines.push(Line::from(
            format!("(choose {})", question.correct_answers.len()).fg(Color::Yellow),
        ));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let feedback = app.feedback();
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_cursor = index == app.selected_option();
        let is_selected = app.selection().contains(&index);
        let is_eliminated = app.eliminated() == Some(index);

        let style = match feedback {
            Some(fb) if fb.correct_answers.contains(&index) => Style::default().fg(Color::Green).bold(),
            Some(_) if is_selected => Style::default().fg(Color::Red),
            _ if is_eliminated => Style::default().fg(Color::DarkGray).crossed_out(),
            _ if is_cursor => Style::default().fg(Color::Cyan).bold(),
            _ => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor && feedback.is_none() { ">" } else { " " };
        let check = if is_selected { "[x]" } else { "[ ]" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {} ", marker, check), style),
            Span::styled(format!("{}. ", Question::option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App) {
    let Some(feedback) = app.feedback() else {
        return;
    };

    let verdict = if feedback.is_correct {
        Span::styled("Correct", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("Incorrect", Style::default().fg(Color::Red).bold())
    };
    let answer: String = feedback
        .correct_answers
        .iter()
        .map(|&i| Question::option_label(i))
        .collect();

    let mut lines = vec![Line::from(vec![
        verdict,
        format!("  ·  answer {}  ·  {:.1}s", answer, feedback.time_taken.as_secs_f64()).fg(Color::DarkGray),
    ])];
    if app.config().show_explanations && !feedback.explanation.is_empty() {
        lines.push(Line::from(feedback.explanation.as_str().fg(Color::Gray)));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, mode: QuizMode) {
    let text = match mode {
        QuizMode::Practice => "j/k move  ·  space select  ·  enter submit/next  ·  h hint  ·  p back  ·  f finish  ·  q quit",
        QuizMode::Exam => "j/k move  ·  space select  ·  enter submit/next  ·  p back  ·  f finish  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
