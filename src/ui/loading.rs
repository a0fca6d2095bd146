use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

use super::source_name;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let spinner = SPINNER[(app.tick() / 2) % SPINNER.len()];
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  Loading questions", spinner),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(source_name(app).fg(Color::DarkGray)),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    render_centered_box(frame, area, content, Color::DarkGray);
}

pub fn render_failed(frame: &mut Frame, area: Rect, app: &App) {
    let message = app.status().unwrap_or("Unknown error");
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "COULD NOT LOAD QUESTIONS",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(message.fg(Color::Gray)),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    render_centered_box(frame, area, content, Color::Red);
}

fn render_centered_box(frame: &mut Frame, area: Rect, content: Vec<Line>, border: Color) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Fill(1),
    ])
    .horizontal_margin(4)
    .split(area);

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(border));

    frame.render_widget(widget, chunks[1]);
}
