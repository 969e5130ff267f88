//! Game rules: teams, rounds, the match ledger, and the session state machine.

mod error;
mod ledger;
mod round;
mod session;
mod team;

pub use error::GameError;
pub use ledger::MatchLedger;
pub use round::{
    DEFAULT_ROUND_SIZE, InsufficientCardsError, Round, Side, Tile, TileKey, build_round,
    usable_cards,
};
pub use session::{Cooldown, CooldownTicket, IgnoreReason, Phase, SelectOutcome, Session};
pub use team::{Team, TeamColor, TeamSetup, TeamSlot};
