//! Event loop tying the screens to the game controller.

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::time::Duration;
use tracing::{debug, info, instrument, warn};
use trivia_match::{GameController, GameError, SelectOutcome};

use super::board::BoardScreen;
use super::screen::{Action, Screen};
use super::setup::SetupScreen;
use super::ui::Status;

/// Active screen in the app state machine.
#[derive(Debug)]
enum ActiveScreen {
    Setup(SetupScreen),
    Board(BoardScreen),
}

impl ActiveScreen {
    fn set_status(&mut self, status: Status) {
        match self {
            ActiveScreen::Setup(s) => s.set_status(status),
            ActiveScreen::Board(s) => s.set_status(status),
        }
    }
}

/// Terminal application.
#[derive(Debug)]
pub struct App {
    controller: GameController,
    screen: ActiveScreen,
}

impl App {
    /// Creates the app on the setup screen.
    pub fn new(controller: GameController) -> Self {
        let screen = ActiveScreen::Setup(SetupScreen::new(controller.setup().clone()));
        Self { controller, screen }
    }

    /// Runs until the user quits.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting event loop");
        self.controller.refresh_cards();

        loop {
            if self.controller.poll_cards() {
                let status = self.card_status();
                self.screen.set_status(status);
            }

            if self.controller.drain_elapsed() > 0
                && let Some(session) = self.controller.session()
            {
                let next = session.team(session.active()).name().clone();
                self.screen
                    .set_status(Status::info(format!("Turn passes to {}", next)));
            }

            self.draw(terminal)?;

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let action = match &mut self.screen {
                    ActiveScreen::Setup(s) => s.handle_key(key, &self.controller),
                    ActiveScreen::Board(s) => s.handle_key(key, &self.controller),
                };

                if !self.apply(action) {
                    info!("Quitting");
                    return Ok(());
                }
            }
        }
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        terminal.draw(|f| match &self.screen {
            ActiveScreen::Setup(s) => s.render(f, &self.controller),
            ActiveScreen::Board(s) => s.render(f, &self.controller),
        })?;
        Ok(())
    }

    /// Performs `action`. Returns false to quit.
    #[instrument(skip(self))]
    fn apply(&mut self, action: Action) -> bool {
        debug!(action = ?action, "Applying action");
        match action {
            Action::Stay => {}
            Action::Quit => return false,
            Action::StartGame(setup) => match self.controller.start_game(setup) {
                Ok(()) => {
                    let mut board = BoardScreen::new();
                    board.set_status(Status::info(self.turn_message()));
                    self.screen = ActiveScreen::Board(board);
                }
                Err(e) => self.report_error(&e),
            },
            Action::Select(key) => {
                if let Some(outcome) = self.controller.select(key)
                    && let ActiveScreen::Board(board) = &mut self.screen
                    && let Some(session) = self.controller.session()
                    && !matches!(outcome, SelectOutcome::ZoomClosed { .. })
                {
                    board.report(&outcome, session);
                }
            }
            Action::CloseZoom => self.controller.close_zoom(),
            Action::NewRound => match self.controller.new_round() {
                Ok(()) => {
                    let mut board = BoardScreen::new();
                    board.set_status(Status::info(format!("New round. {}", self.turn_message())));
                    self.screen = ActiveScreen::Board(board);
                }
                Err(e) => self.report_error(&e),
            },
            Action::ChangeTeams => {
                self.controller.change_teams();
                self.screen =
                    ActiveScreen::Setup(SetupScreen::new(self.controller.setup().clone()));
            }
            Action::RefreshCards => {
                let status = if self.controller.refresh_cards() {
                    Status::info("Reloading cards...")
                } else {
                    Status::info("Cards are already loading")
                };
                self.screen.set_status(status);
            }
        }
        true
    }

    /// Status line for a fetch that just finished.
    fn card_status(&self) -> Status {
        let store = self.controller.store();
        match store.error() {
            Some(e) => Status::error(e.to_string()),
            None if self.controller.session().is_some() => Status::info(format!(
                "Loaded {} cards. They apply from the next round",
                store.cards().len()
            )),
            None => Status::info(format!("Loaded {} cards", store.cards().len())),
        }
    }

    fn report_error(&mut self, error: &GameError) {
        warn!(error = %error, "Could not start round");
        self.screen.set_status(Status::error(error.to_string()));
    }

    fn turn_message(&self) -> String {
        match self.controller.session() {
            Some(session) => format!("{} goes first", session.team(session.active()).name()),
            None => String::new(),
        }
    }
}
