//! Card and wire payload types for the card-list endpoint.

use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

/// A single question/answer pair.
///
/// Fields that arrive as `null` or are missing decode as empty strings.
/// Such cards are kept in the fetched list but are not usable in a round,
/// see [`Card::is_usable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Card {
    /// Identifier shared by the question and answer tiles of this pair.
    #[serde(default, deserialize_with = "null_as_empty")]
    id: String,
    /// Question text.
    #[serde(default, deserialize_with = "null_as_empty")]
    question: String,
    /// Answer text.
    #[serde(default, deserialize_with = "null_as_empty")]
    answer: String,
}

impl Card {
    /// Creates a new card.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Returns true when id, question and answer are all non-blank.
    #[instrument(skip(self), fields(card_id = %self.id))]
    pub fn is_usable(&self) -> bool {
        !self.id.trim().is_empty()
            && !self.question.trim().is_empty()
            && !self.answer.trim().is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET /api/cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsPayload {
    /// Row count reported by the server. Advisory only.
    #[serde(default)]
    pub count: usize,
    /// The cards.
    pub cards: Vec<Card>,
}

impl CardsPayload {
    /// Wraps a card list, filling in the count.
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            count: cards.len(),
            cards,
        }
    }
}
