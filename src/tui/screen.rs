//! Screen trait and the actions screens hand back to the app.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use trivia_match::{GameController, TeamSetup, TileKey};

/// What the app should do after a key press.
///
/// Screens return this from [`Screen::handle_key`]; the app performs it
/// against the [`GameController`].
#[derive(Debug, Clone)]
pub enum Action {
    /// Nothing to do.
    Stay,
    /// Start a game with these teams.
    StartGame(TeamSetup),
    /// Click a tile.
    Select(TileKey),
    /// Close the detail view.
    CloseZoom,
    /// Deal a new round for the same teams.
    NewRound,
    /// Discard the game and go back to team setup.
    ChangeTeams,
    /// Fetch the card list again.
    RefreshCards,
    /// Exit.
    Quit,
}

/// Implemented by the setup and board screens.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame, controller: &GameController);

    /// Handles a key event and returns the resulting [`Action`].
    fn handle_key(&mut self, key: KeyEvent, controller: &GameController) -> Action;
}
