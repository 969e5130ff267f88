//! Round building: card selection and independent question/answer shuffles.

use std::collections::HashSet;

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::cards::Card;

/// Number of pairs in a standard round.
pub const DEFAULT_ROUND_SIZE: usize = 15;

/// Which grid a tile lives in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Side {
    /// The question grid.
    Question,
    /// The answer grid.
    Answer,
}

impl Side {
    /// Returns the other grid.
    pub fn other(self) -> Self {
        match self {
            Self::Question => Self::Answer,
            Self::Answer => Self::Question,
        }
    }
}

/// Stable, round-scoped position of a tile: its grid plus its slot in that grid.
///
/// Distinct from the card id. The two grids are shuffled independently, so the
/// same card sits at unrelated indices on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[display("{side}#{index}")]
pub struct TileKey {
    /// Grid.
    pub side: Side,
    /// Zero-based slot within the grid.
    pub index: usize,
}

impl TileKey {
    /// Creates a key.
    pub fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    /// Key of a question tile.
    pub fn question(index: usize) -> Self {
        Self::new(Side::Question, index)
    }

    /// Key of an answer tile.
    pub fn answer(index: usize) -> Self {
        Self::new(Side::Answer, index)
    }
}

/// A card shown on one side of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Tile {
    key: TileKey,
    card: Card,
}

impl Tile {
    /// Text shown when the tile is face up.
    pub fn text(&self) -> &str {
        match self.key.side {
            Side::Question => self.card.question(),
            Side::Answer => self.card.answer(),
        }
    }

    /// Id of the underlying card.
    pub fn card_id(&self) -> &str {
        self.card.id()
    }
}

/// The question order and answer order of one round.
///
/// Both sides cover the same card ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    questions: Vec<Tile>,
    answers: Vec<Tile>,
}

impl Round {
    fn from_orders(questions: Vec<Card>, answers: Vec<Card>) -> Self {
        let wrap = |side: Side, cards: Vec<Card>| -> Vec<Tile> {
            cards
                .into_iter()
                .enumerate()
                .map(|(index, card)| Tile {
                    key: TileKey::new(side, index),
                    card,
                })
                .collect()
        };
        Self {
            questions: wrap(Side::Question, questions),
            answers: wrap(Side::Answer, answers),
        }
    }

    /// Number of pairs.
    pub fn size(&self) -> usize {
        self.questions.len()
    }

    /// Tiles of one side in display order.
    pub fn tiles(&self, side: Side) -> &[Tile] {
        match side {
            Side::Question => &self.questions,
            Side::Answer => &self.answers,
        }
    }

    /// Tile at `key`, if the key is in range.
    pub fn tile(&self, key: TileKey) -> Option<&Tile> {
        self.tiles(key.side).get(key.index)
    }

    /// Key of the tile on `side` showing the card `card_id`.
    pub fn find(&self, side: Side, card_id: &str) -> Option<TileKey> {
        self.tiles(side)
            .iter()
            .find(|tile| tile.card_id() == card_id)
            .map(|tile| tile.key)
    }

    /// Card ids of one side in display order.
    pub fn card_ids(&self, side: Side) -> Vec<&str> {
        self.tiles(side).iter().map(Tile::card_id).collect()
    }
}

/// Not enough usable cards to fill a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Need at least {required} complete cards for a round, but only {available} are available")]
pub struct InsufficientCardsError {
    /// Usable cards found.
    pub available: usize,
    /// Cards a round needs.
    pub required: usize,
}

/// Cards that can appear in a round, in input order.
///
/// Drops cards with a blank id, question or answer, and every card whose id
/// was already seen.
#[instrument(skip(cards), fields(total = cards.len()))]
pub fn usable_cards(cards: &[Card]) -> Vec<&Card> {
    let mut seen = HashSet::new();
    let usable: Vec<&Card> = cards
        .iter()
        .filter(|card| card.is_usable())
        .filter(|&card| {
            let fresh = seen.insert(card.id().as_str());
            if !fresh {
                warn!(card_id = %card.id(), "Duplicate card id ignored");
            }
            fresh
        })
        .collect();
    debug!(usable = usable.len(), "Filtered usable cards");
    usable
}

/// Picks `size` usable cards at random and lays them out as a new round.
///
/// The selection is a uniform permutation of the usable cards cut to `size`.
/// Questions and answers are then shuffled independently of each other.
///
/// # Errors
///
/// Returns [`InsufficientCardsError`] when fewer than `size` cards are usable.
#[instrument(skip(cards, rng), fields(total = cards.len()))]
pub fn build_round<R: Rng + ?Sized>(
    cards: &[Card],
    size: usize,
    rng: &mut R,
) -> Result<Round, InsufficientCardsError> {
    let mut pool = usable_cards(cards);
    if pool.len() < size {
        warn!(available = pool.len(), required = size, "Not enough cards for a round");
        return Err(InsufficientCardsError {
            available: pool.len(),
            required: size,
        });
    }

    pool.shuffle(rng);
    pool.truncate(size);

    let mut questions: Vec<Card> = pool.into_iter().cloned().collect();
    let mut answers = questions.clone();
    questions.shuffle(rng);
    answers.shuffle(rng);

    info!(size, "Round built");
    Ok(Round::from_orders(questions, answers))
}
