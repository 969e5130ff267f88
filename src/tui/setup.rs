//! Team setup screen: names, colors and who moves first.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};
use trivia_match::{CardStore, GameController, TeamColor, TeamSetup, TeamSlot, usable_cards};

use super::screen::{Action, Screen};
use super::ui::{Status, draw_help, draw_status, team_color};

/// Editable rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name(TeamSlot),
    Color(TeamSlot),
    Starting,
    Start,
}

const FIELDS: [Field; 6] = [
    Field::Name(TeamSlot::First),
    Field::Color(TeamSlot::First),
    Field::Name(TeamSlot::Second),
    Field::Color(TeamSlot::Second),
    Field::Starting,
    Field::Start,
];

/// State for the setup screen.
#[derive(Debug)]
pub struct SetupScreen {
    setup: TeamSetup,
    list_state: ListState,
    status: Option<Status>,
}

impl SetupScreen {
    /// Creates the screen pre-filled with `setup`.
    #[instrument(skip(setup))]
    pub fn new(setup: TeamSetup) -> Self {
        debug!("Initializing SetupScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            setup,
            list_state,
            status: None,
        }
    }

    /// Shows `status` under the form.
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    fn field(&self) -> Field {
        FIELDS[self.list_state.selected().unwrap_or(0).min(FIELDS.len() - 1)]
    }

    fn move_selection(&mut self, down: bool) {
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(FIELDS.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name(slot) => Some(&mut self.setup.names[slot.index()]),
            Field::Color(slot) => Some(&mut self.setup.colors[slot.index()]),
            Field::Starting | Field::Start => None,
        }
    }

    #[instrument(skip(self))]
    fn toggle_starting(&mut self) {
        self.setup.starting = self.setup.starting.other();
        info!(starting = %self.setup.starting, "Toggled starting team");
    }

    fn row(&self, field: Field) -> ListItem<'static> {
        match field {
            Field::Name(slot) => ListItem::new(format!(
                "{} name:   {}",
                slot,
                self.setup.names[slot.index()]
            )),
            Field::Color(slot) => {
                let typed = &self.setup.colors[slot.index()];
                let color = TeamColor::parse_or(typed, slot.default_color());
                let mut spans = vec![
                    Span::raw(format!("{} color:  {:<9}", slot, typed)),
                    Span::styled("      ", Style::default().bg(team_color(color))),
                ];
                if TeamColor::parse(typed).is_none() {
                    spans.push(Span::styled(
                        format!("  invalid, using {}", color),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            }
            Field::Starting => {
                ListItem::new(format!("Moves first:   [ {} ]", self.setup.starting))
            }
            Field::Start => ListItem::new(Line::from(Span::styled(
                "Start game",
                Style::default().add_modifier(Modifier::BOLD),
            ))),
        }
    }
}

fn card_summary(store: &CardStore) -> (String, Color) {
    if store.loading() {
        return ("Loading cards...".to_string(), Color::Yellow);
    }
    if let Some(err) = store.error() {
        return (format!("{} (F5 to retry)", err), Color::Red);
    }
    if !store.loaded() {
        return ("Cards not loaded yet".to_string(), Color::DarkGray);
    }
    let cards = store.cards();
    (
        format!(
            "{} cards ({} usable) from {}",
            cards.len(),
            usable_cards(cards).len(),
            store.describe()
        ),
        Color::Green,
    )
}

impl Screen for SetupScreen {
    #[instrument(skip(self, frame, controller))]
    fn render(&self, frame: &mut Frame, controller: &GameController) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Trivia Match")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let (summary, color) = card_summary(controller.store());
        let cards = Paragraph::new(summary)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Cards"));
        frame.render_widget(cards, chunks[1]);

        let items: Vec<ListItem> = FIELDS.iter().map(|&field| self.row(field)).collect();
        let title = format!("Teams ({} pairs per round)", controller.config().round_size());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, chunks[2], &mut list_state);

        draw_status(frame, chunks[3], self.status.as_ref());
        draw_help(
            frame,
            chunks[4],
            "↑↓: Field | Type to edit | ←→/Space: Toggle | Enter on Start game: Play | F5: Reload cards | Esc: Quit",
        );
    }

    #[instrument(skip(self, key, _controller))]
    fn handle_key(&mut self, key: KeyEvent, _controller: &GameController) -> Action {
        let field = self.field();
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::F(5) => Action::RefreshCards,
            KeyCode::Up => {
                self.move_selection(false);
                Action::Stay
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_selection(true);
                Action::Stay
            }
            KeyCode::Enter if field == Field::Start => {
                info!("Start requested from setup");
                self.status = None;
                Action::StartGame(self.setup.clone())
            }
            KeyCode::Enter if field != Field::Starting => {
                self.move_selection(true);
                Action::Stay
            }
            KeyCode::Enter | KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if field == Field::Starting =>
            {
                self.toggle_starting();
                Action::Stay
            }
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut(field) {
                    text.pop();
                }
                Action::Stay
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.text_mut(field) {
                    text.push(c);
                }
                Action::Stay
            }
            _ => Action::Stay,
        }
    }
}
