//! Errors that block starting a game or a round.

use derive_more::{Display, Error, From};

use super::round::InsufficientCardsError;
use crate::cards::FetchError;

/// The card list is unavailable or too small.
#[derive(Debug, Clone, Display, Error, From)]
pub enum GameError {
    /// The last card fetch failed.
    #[display("{_0}")]
    Fetch(FetchError),
    /// Not enough usable cards for a round.
    #[display("{_0}")]
    InsufficientCards(InsufficientCardsError),
}
