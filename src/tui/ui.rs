//! Shared rendering helpers.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use trivia_match::TeamColor;

/// A one-line message shown under a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    text: String,
    is_error: bool,
}

impl Status {
    /// An informational message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// An error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Renders `status` (or an empty box) into `area`.
pub fn draw_status(frame: &mut Frame, area: Rect, status: Option<&Status>) {
    let (text, color) = match status {
        Some(s) if s.is_error => (s.text.as_str(), Color::Red),
        Some(s) => (s.text.as_str(), Color::Yellow),
        None => ("", Color::Yellow),
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(paragraph, area);
}

/// Renders a dimmed key-binding line.
pub fn draw_help(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

/// Terminal color for a team.
pub fn team_color(color: TeamColor) -> Color {
    Color::Rgb(color.red, color.green, color.blue)
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
pub fn center_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
