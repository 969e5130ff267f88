//! Board screen: scoreboard, question and answer grids, detail view.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};
use trivia_match::{
    GameController, IgnoreReason, SelectOutcome, Session, Side, TeamSlot, TileKey,
};

use super::input::{COLUMNS, GridCursor};
use super::screen::{Action, Screen};
use super::ui::{Status, center_rect, draw_help, draw_status, team_color};

const HELP: &str = "Arrows: Move | Tab: Other grid | Enter/Space: Flip | Esc: Close | n: New round | c: Change teams | r: Reload cards | q: Quit";

/// State for the board screen.
#[derive(Debug, Default)]
pub struct BoardScreen {
    cursor: GridCursor,
    status: Option<Status>,
}

impl BoardScreen {
    /// Creates the screen with the cursor on the first question.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `status` under the board.
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    /// Describes what a selection did.
    #[instrument(skip(self, session))]
    pub fn report(&mut self, outcome: &SelectOutcome, session: &Session) {
        let message = match outcome {
            SelectOutcome::Ignored(IgnoreReason::SidePending) => {
                Some("Pick a tile from the other grid".to_string())
            }
            SelectOutcome::Ignored(IgnoreReason::CoolingDown) => {
                Some("Wait for the wrong pair to flip back".to_string())
            }
            SelectOutcome::Ignored(IgnoreReason::RoundComplete) => {
                Some("Round over. Press n for a new round".to_string())
            }
            SelectOutcome::Ignored(IgnoreReason::UnknownTile) => None,
            SelectOutcome::Revealed(key) => Some(format!(
                "{} flipped a {}",
                session.team(session.active()).name(),
                key.side
            )),
            SelectOutcome::Matched {
                team,
                round_complete: true,
                ..
            } => Some(format!(
                "{} found the last pair. {}",
                session.team(*team).name(),
                result_line(session)
            )),
            SelectOutcome::Matched { team, .. } => Some(format!(
                "Match! {} scores and goes again",
                session.team(*team).name()
            )),
            SelectOutcome::Mismatched { .. } => Some(format!(
                "No match. Turn passes to {} after the cooldown",
                session.team(session.active().other()).name()
            )),
            SelectOutcome::ZoomOpened { paused: Some(_), .. } => {
                Some("Cooldown paused while the card is open".to_string())
            }
            SelectOutcome::ZoomOpened { .. } | SelectOutcome::ZoomClosed { .. } => None,
        };
        debug!(message = ?message, "Board status");
        self.status = message.map(Status::info);
    }

    fn grid_len(controller: &GameController) -> usize {
        controller.session().map_or(0, |s| s.round().size())
    }
}

/// "Team wins" or "Draw" for a finished round.
fn result_line(session: &Session) -> String {
    let [first, second] = session.scores();
    match first.cmp(&second) {
        std::cmp::Ordering::Greater => format!("{} wins!", session.team(TeamSlot::First).name()),
        std::cmp::Ordering::Less => format!("{} wins!", session.team(TeamSlot::Second).name()),
        std::cmp::Ordering::Equal => "It's a draw!".to_string(),
    }
}

fn draw_scoreboard(frame: &mut Frame, area: Rect, session: &Session, controller: &GameController) {
    let mut lines: Vec<Line> = TeamSlot::ALL
        .iter()
        .map(|&slot| {
            let team = session.team(slot);
            let marker = if slot == session.active() && !session.is_complete() {
                "▶ "
            } else {
                "  "
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<20}", team.name()),
                    Style::default()
                        .fg(team_color(*team.color()))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>3}", team.score())),
            ])
        })
        .collect();

    let mut progress = format!(
        "Matched {}/{}",
        session.ledger().len(),
        session.round().size()
    );
    if session.is_complete() {
        progress.push_str("   ");
        progress.push_str(&result_line(session));
    } else if let Some(remaining) = controller.cooldown_remaining() {
        let state = if controller.cooldown_paused() {
            " (paused)"
        } else {
            ""
        };
        progress.push_str(&format!(
            "   Flip back in {:.1}s{}",
            remaining.as_secs_f32(),
            state
        ));
    }
    lines.push(Line::from(Span::styled(
        progress,
        Style::default().fg(Color::Gray),
    )));

    let scoreboard =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Score"));
    frame.render_widget(scoreboard, area);
}

fn draw_grid(
    frame: &mut Frame,
    area: Rect,
    side: Side,
    session: &Session,
    cursor: Option<TileKey>,
) {
    let title = match side {
        Side::Question => "Questions",
        Side::Answer => "Answers",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tiles = session.round().tiles(side);
    if tiles.is_empty() {
        return;
    }
    let rows = tiles.len().div_ceil(COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows).map(|_| Constraint::Ratio(1, rows as u32)))
        .split(inner);

    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..COLUMNS).map(|_| Constraint::Ratio(1, COLUMNS as u32)))
            .split(*row_area);
        for (column, cell) in cells.iter().enumerate() {
            let index = row * COLUMNS + column;
            let Some(tile) = tiles.get(index) else {
                break;
            };
            let key = *tile.key();
            let (text, style) = match session.winner_of(key) {
                Some(team) => (
                    tile.text().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .bg(team_color(*session.team(team).color())),
                ),
                None if session.is_revealed(key) => (
                    tile.text().to_string(),
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                ),
                None => (
                    format!("{}", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
            };
            let border = if cursor == Some(key) {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let paragraph = Paragraph::new(text)
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(border));
            frame.render_widget(paragraph, *cell);
        }
    }
}

fn draw_zoom(frame: &mut Frame, session: &Session, controller: &GameController) {
    let Some(tile) = session.zoom() else {
        return;
    };
    let area = center_rect(frame.area(), 60, 50);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            tile.key().side.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            tile.text().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let key = *tile.key();
    if let Some(team) = session.winner_of(key) {
        let other = session
            .round()
            .find(key.side.other(), tile.card_id())
            .and_then(|partner| session.round().tile(partner));
        if let Some(partner) = other {
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "{}: {}",
                partner.key().side,
                partner.text()
            )));
        }
        let team = session.team(team);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Matched by {}", team.name()),
            Style::default().fg(team_color(*team.color())),
        )));
    }
    if controller.cooldown_paused()
        && let Some(remaining) = controller.cooldown_remaining()
    {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Cooldown paused with {:.1}s left", remaining.as_secs_f32()),
            Style::default().fg(Color::Yellow),
        )));
    }

    let zoom = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Card (Esc to close)")
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(zoom, area);
}

impl Screen for BoardScreen {
    #[instrument(skip(self, frame, controller))]
    fn render(&self, frame: &mut Frame, controller: &GameController) {
        let Some(session) = controller.session() else {
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        draw_scoreboard(frame, chunks[0], session, controller);

        let grids = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        let cursor = Some(self.cursor.key());
        for (side, area) in Side::iter().zip(grids.iter()) {
            draw_grid(frame, *area, side, session, cursor);
        }

        draw_status(frame, chunks[2], self.status.as_ref());
        draw_help(frame, chunks[3], HELP);

        draw_zoom(frame, session, controller);
    }

    #[instrument(skip(self, key, controller))]
    fn handle_key(&mut self, key: KeyEvent, controller: &GameController) -> Action {
        let len = Self::grid_len(controller);
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = self.cursor.moved(key.code, len);
                Action::Stay
            }
            KeyCode::Tab => {
                self.cursor = self.cursor.switched(len);
                Action::Stay
            }
            KeyCode::Enter | KeyCode::Char(' ') => Action::Select(self.cursor.key()),
            KeyCode::Esc => Action::CloseZoom,
            KeyCode::Char('n') | KeyCode::Char('N') => Action::NewRound,
            KeyCode::Char('c') | KeyCode::Char('C') => Action::ChangeTeams,
            KeyCode::Char('r') | KeyCode::Char('R') => Action::RefreshCards,
            KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
            _ => Action::Stay,
        }
    }
}
