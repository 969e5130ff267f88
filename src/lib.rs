//! Trivia Match - a two-team trivia memory match game
//!
//! Teams take turns turning over one question tile and one answer tile. A
//! matching pair scores a point and the team keeps the turn; a wrong pair
//! stays visible for a cooldown and then the turn passes.
//!
//! # Architecture
//!
//! - **Cards**: card list loading from the card endpoint or a deck file
//! - **Game**: teams, round building, match ledger, and the session state machine
//! - **Timer**: the pausable, cancellable mismatch cooldown
//! - **Controller**: ties the session to the card store and the timer
//!
//! # Example
//!
//! ```no_run
//! use trivia_match::{GameConfig, GameController, HttpCardSource, TeamSetup};
//!
//! # async fn example() -> Result<(), trivia_match::GameError> {
//! let source = HttpCardSource::new("http://localhost:5000");
//! let mut controller = GameController::new(Box::new(source), GameConfig::default());
//! controller.load_cards().await;
//! controller.start_game(TeamSetup::default())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cards;
mod config;
mod controller;
mod game;
mod timer;

// Crate-level exports - Cards
pub use cards::{
    CARDS_PATH, Card, CardSource, CardStore, CardsPayload, DEFAULT_API_BASE,
    FetchError, FetchErrorKind, FileCardSource, HttpCardSource, MAX_ERROR_BODY_CHARS, StaticCardSource,
    truncate_body,
};

// Crate-level exports - Configuration
pub use config::{
    API_BASE_ENV, AppConfig, ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_COOLDOWN_MS, GameConfig,
};

// Crate-level exports - Controller
pub use controller::GameController;

// Crate-level exports - Game rules
pub use game::{
    Cooldown, CooldownTicket, DEFAULT_ROUND_SIZE, GameError, IgnoreReason, InsufficientCardsError,
    MatchLedger, Phase, Round, SelectOutcome, Session, Side, Team, TeamColor, TeamSetup, TeamSlot,
    Tile, TileKey, build_round, usable_cards,
};

// Crate-level exports - Timer
pub use timer::CooldownTimer;
