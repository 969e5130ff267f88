//! Terminal UI for Trivia Match

mod app;
mod board;
mod input;
mod screen;
mod setup;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};
use trivia_match::{CardSource, GameConfig, GameController};

use app::App;

/// Log file used while the terminal is in raw mode.
const LOG_FILE: &str = "trivia_match.log";

/// Runs the game in the terminal until the user quits.
pub async fn run_tui(source: Box<dyn CardSource>, config: GameConfig) -> Result<()> {
    // Log to a file so output does not tear the screen.
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(source = %source.describe(), "Starting Trivia Match TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(GameController::new(source, config));
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "TUI exited with error");
    }
    info!("Trivia Match TUI finished");
    result
}
