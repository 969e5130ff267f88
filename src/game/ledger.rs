//! Which team won each matched pair in the current round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::team::TeamSlot;

/// Maps card id to the team that matched it.
///
/// Entries are only ever added; a new round starts from an empty ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLedger {
    entries: BTreeMap<String, TeamSlot>,
}

impl MatchLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `card_id` as won by `team`.
    ///
    /// Returns false, leaving the existing entry alone, if the card was
    /// already matched.
    #[instrument(skip(self))]
    pub fn record(&mut self, card_id: &str, team: TeamSlot) -> bool {
        if self.entries.contains_key(card_id) {
            debug!("Card already in ledger");
            return false;
        }
        self.entries.insert(card_id.to_string(), team);
        true
    }

    /// Team that matched `card_id`.
    pub fn winner(&self, card_id: &str) -> Option<TeamSlot> {
        self.entries.get(card_id).copied()
    }

    /// True if `card_id` has been matched.
    pub fn contains(&self, card_id: &str) -> bool {
        self.entries.contains_key(card_id)
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been matched yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs matched by `team`.
    pub fn count_for(&self, team: TeamSlot) -> usize {
        self.entries.values().filter(|&&t| t == team).count()
    }

    /// All entries ordered by card id.
    pub fn entries(&self) -> impl Iterator<Item = (&str, TeamSlot)> {
        self.entries.iter().map(|(id, team)| (id.as_str(), *team))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
