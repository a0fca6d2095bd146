use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::data::QuestionSource;

use super::source_name;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(15),
        Constraint::Fill(1),
    ])
    .horizontal_margin(4)
    .split(area);

    let source = match app.source() {
        Some(QuestionSource::Cache) => " (cached)",
        Some(QuestionSource::Json) => " (question bank)",
        _ => "",
    };
    let difficulty = app
        .difficulty()
        .map_or_else(|| "All".to_string(), |d| d.to_string());

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PDF QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(format!("{}{}", source_name(app), source).fg(Color::Gray)),
        Line::from(format!("{} questions", app.questions().len()).fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            "difficulty ".fg(Color::DarkGray),
            difficulty.fg(Color::White),
            "  ·  order ".fg(Color::DarkGray),
            app.order().label().fg(Color::White),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ENTER", Style::default().fg(Color::Green).bold()),
            " practice  ·  ".fg(Color::DarkGray),
            Span::styled("e", Style::default().fg(Color::Yellow).bold()),
            format!(" exam ({} questions)", app.config().exam_question_count).fg(Color::DarkGray),
        ]),
        Line::from("d difficulty  ·  o order  ·  q quit".fg(Color::DarkGray)),
    ];

    if let Some(status) = app.status() {
        content.push(Line::from(""));
        content.push(Line::from(status.fg(Color::Yellow)));
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, chunks[1]);
}
