//! Turn and match state machine for one game session.
//!
//! A [`Session`] is plain data: every transition is a method that mutates it
//! and reports what happened as a [`SelectOutcome`]. Waiting out the mismatch
//! cooldown is left to the caller, which schedules a timer for the returned
//! [`CooldownTicket`] and hands the ticket back through
//! [`Session::expire_cooldown`] when it fires.

use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::ledger::MatchLedger;
use super::round::{Round, Side, Tile, TileKey};
use super::team::{Team, TeamSlot};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one scheduled mismatch cooldown.
///
/// Tickets come from a process-wide counter, so a ticket issued to a
/// discarded session never equals one issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("cooldown-{_0}")]
pub struct CooldownTicket(u64);

impl CooldownTicket {
    pub(crate) fn issue() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw ticket number.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A pending mismatch flip-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Ticket the timer must present to end this cooldown.
    pub ticket: CooldownTicket,
    /// True while the zoom view holds the countdown.
    pub paused: bool,
}

/// Where the session is in the reveal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Phase {
    /// No unmatched tile is face up.
    Idle,
    /// One side has a pending reveal.
    #[display("OneRevealed({_0})")]
    OneRevealed(Side),
    /// A wrong pair is showing until the cooldown ends.
    MismatchCooldown,
    /// Every pair in the round has been matched.
    Complete,
}

/// Why a selection changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The key points outside the board.
    UnknownTile,
    /// That side already has a tile waiting for its partner.
    SidePending,
    /// A mismatch is showing and the tile is not one of the pair.
    CoolingDown,
    /// The round is over.
    RoundComplete,
}

/// Result of [`Session::select`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The tile was turned face up and waits for the other side.
    Revealed(TileKey),
    /// The revealed pair matched.
    Matched {
        /// Card that was matched.
        card_id: String,
        /// Team credited with the match. It keeps the turn.
        team: TeamSlot,
        /// True if this match finished the round.
        round_complete: bool,
    },
    /// The revealed pair did not match; a cooldown started.
    Mismatched {
        /// Ticket for the timer that ends the cooldown.
        ticket: CooldownTicket,
    },
    /// The detail view opened on a tile.
    ZoomOpened {
        /// Tile shown in the detail view.
        key: TileKey,
        /// Cooldown paused by opening the view.
        paused: Option<CooldownTicket>,
    },
    /// The detail view closed.
    ZoomClosed {
        /// Cooldown to resume.
        resumed: Option<CooldownTicket>,
    },
}

/// Teams, board, ledger, turn and reveal state of a running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    teams: [Team; 2],
    starting: TeamSlot,
    active: TeamSlot,
    round: Round,
    ledger: MatchLedger,
    revealed_question: Option<usize>,
    revealed_answer: Option<usize>,
    cooldown: Option<Cooldown>,
    zoom: Option<TileKey>,
}

impl Session {
    /// Starts a session on `round` with `starting` to move. Scores start at zero.
    #[instrument(skip(teams, round), fields(round_size = round.size()))]
    pub fn new(mut teams: [Team; 2], starting: TeamSlot, round: Round) -> Self {
        info!(
            first = %teams[0].name(),
            second = %teams[1].name(),
            "Starting session"
        );
        for team in &mut teams {
            team.reset_score();
        }
        Self {
            teams,
            starting,
            active: starting,
            round,
            ledger: MatchLedger::new(),
            revealed_question: None,
            revealed_answer: None,
            cooldown: None,
            zoom: None,
        }
    }

    /// Replaces the round and clears ledger, reveals, cooldown and scores.
    ///
    /// Team names and colors are kept and the starting team moves first again.
    /// Any outstanding cooldown ticket is abandoned.
    #[instrument(skip(self, round), fields(round_size = round.size()))]
    pub fn restart(&mut self, round: Round) {
        if let Some(cooldown) = self.cooldown.take() {
            debug!(ticket = %cooldown.ticket, "Abandoning cooldown");
        }
        for team in &mut self.teams {
            team.reset_score();
        }
        self.round = round;
        self.ledger.clear();
        self.revealed_question = None;
        self.revealed_answer = None;
        self.zoom = None;
        self.active = self.starting;
        info!("Round restarted");
    }

    /// Handles a click on the tile at `key`.
    ///
    /// While the detail view is open, any selection just closes it.
    #[instrument(skip(self), fields(active = %self.active))]
    pub fn select(&mut self, key: TileKey) -> SelectOutcome {
        if self.zoom.is_some() {
            let resumed = self.close_zoom();
            return SelectOutcome::ZoomClosed { resumed };
        }

        let Some(card_id) = self.round.tile(key).map(|t| t.card_id().to_string()) else {
            debug!("Selection outside the board");
            return SelectOutcome::Ignored(IgnoreReason::UnknownTile);
        };

        if let Some(cooldown) = self.cooldown.as_mut() {
            if !(self.revealed_question == Some(key.index) && key.side == Side::Question
                || self.revealed_answer == Some(key.index) && key.side == Side::Answer)
            {
                debug!("Selection dropped during cooldown");
                return SelectOutcome::Ignored(IgnoreReason::CoolingDown);
            }
            cooldown.paused = true;
            let ticket = cooldown.ticket;
            self.zoom = Some(key);
            debug!(ticket = %ticket, "Zoom opened, cooldown paused");
            return SelectOutcome::ZoomOpened {
                key,
                paused: Some(ticket),
            };
        }

        if self.ledger.contains(&card_id) {
            self.zoom = Some(key);
            return SelectOutcome::ZoomOpened { key, paused: None };
        }

        if self.is_complete() {
            return SelectOutcome::Ignored(IgnoreReason::RoundComplete);
        }

        if self.pending_index(key.side).is_some() {
            debug!(side = %key.side, "Side already has a pending reveal");
            return SelectOutcome::Ignored(IgnoreReason::SidePending);
        }

        match key.side {
            Side::Question => self.revealed_question = Some(key.index),
            Side::Answer => self.revealed_answer = Some(key.index),
        }

        match (self.revealed_question, self.revealed_answer) {
            (Some(question), Some(answer)) => self.evaluate(question, answer),
            _ => {
                debug!(card_id = %card_id, "Tile revealed");
                SelectOutcome::Revealed(key)
            }
        }
    }

    fn evaluate(&mut self, question: usize, answer: usize) -> SelectOutcome {
        let (Some(question_tile), Some(answer_tile)) = (
            self.round.tile(TileKey::question(question)),
            self.round.tile(TileKey::answer(answer)),
        ) else {
            warn!(question, answer, "Revealed tile outside the board, clearing reveals");
            self.revealed_question = None;
            self.revealed_answer = None;
            return SelectOutcome::Ignored(IgnoreReason::UnknownTile);
        };
        let question_id = question_tile.card_id().to_string();
        let answer_id = answer_tile.card_id();

        if question_id != answer_id {
            let ticket = CooldownTicket::issue();
            self.cooldown = Some(Cooldown {
                ticket,
                paused: false,
            });
            info!(
                question = %question_id,
                answer = %answer_id,
                ticket = %ticket,
                "Mismatch"
            );
            return SelectOutcome::Mismatched { ticket };
        }

        let team = self.active;
        self.ledger.record(&question_id, team);
        self.teams[team.index()].award_point();
        self.revealed_question = None;
        self.revealed_answer = None;

        let round_complete = self.is_complete();
        info!(
            card_id = %question_id,
            team = %team,
            score = self.teams[team.index()].score(),
            round_complete,
            "Match"
        );
        SelectOutcome::Matched {
            card_id: question_id,
            team,
            round_complete,
        }
    }

    /// Closes the detail view. Returns the cooldown ticket to resume, if the
    /// view had paused one.
    #[instrument(skip(self))]
    pub fn close_zoom(&mut self) -> Option<CooldownTicket> {
        self.zoom.take()?;
        let cooldown = self.cooldown.as_mut().filter(|c| c.paused)?;
        cooldown.paused = false;
        debug!(ticket = %cooldown.ticket, "Zoom closed, cooldown resumed");
        Some(cooldown.ticket)
    }

    /// Ends the cooldown identified by `ticket`: hides the wrong pair and
    /// passes the turn.
    ///
    /// Returns false and changes nothing when `ticket` is not the current
    /// cooldown's ticket.
    #[instrument(skip(self))]
    pub fn expire_cooldown(&mut self, ticket: CooldownTicket) -> bool {
        match self.cooldown {
            Some(cooldown) if cooldown.ticket == ticket => {
                self.cooldown = None;
                self.revealed_question = None;
                self.revealed_answer = None;
                self.zoom = None;
                self.active = self.active.other();
                info!(active = %self.active, "Cooldown over, turn passed");
                true
            }
            _ => {
                warn!("Ignoring stale cooldown ticket");
                false
            }
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.is_complete() {
            Phase::Complete
        } else if self.cooldown.is_some() {
            Phase::MismatchCooldown
        } else if self.revealed_question.is_some() {
            Phase::OneRevealed(Side::Question)
        } else if self.revealed_answer.is_some() {
            Phase::OneRevealed(Side::Answer)
        } else {
            Phase::Idle
        }
    }

    /// True once every pair has been matched.
    pub fn is_complete(&self) -> bool {
        self.ledger.len() == self.round.size()
    }

    /// True if `key` is a pending (unmatched) reveal.
    pub fn is_revealed(&self, key: TileKey) -> bool {
        self.pending_index(key.side) == Some(key.index)
    }

    /// True if `key` is shown face up, either pending or matched.
    pub fn is_face_up(&self, key: TileKey) -> bool {
        self.is_revealed(key) || self.winner_of(key).is_some()
    }

    /// Team that matched the card under `key`.
    pub fn winner_of(&self, key: TileKey) -> Option<TeamSlot> {
        self.round
            .tile(key)
            .and_then(|tile| self.ledger.winner(tile.card_id()))
    }

    /// Pending reveal on `side`.
    pub fn pending(&self, side: Side) -> Option<TileKey> {
        self.pending_index(side).map(|index| TileKey::new(side, index))
    }

    fn pending_index(&self, side: Side) -> Option<usize> {
        match side {
            Side::Question => self.revealed_question,
            Side::Answer => self.revealed_answer,
        }
    }

    /// Both teams, by slot index.
    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    /// Team in `slot`.
    pub fn team(&self, slot: TeamSlot) -> &Team {
        &self.teams[slot.index()]
    }

    /// Scores by slot index.
    pub fn scores(&self) -> [u32; 2] {
        [*self.teams[0].score(), *self.teams[1].score()]
    }

    /// Team whose turn it is.
    pub fn active(&self) -> TeamSlot {
        self.active
    }

    /// Team that moves first in every round.
    pub fn starting(&self) -> TeamSlot {
        self.starting
    }

    /// The board.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Matched pairs.
    pub fn ledger(&self) -> &MatchLedger {
        &self.ledger
    }

    /// Pending cooldown.
    pub fn cooldown(&self) -> Option<Cooldown> {
        self.cooldown
    }

    /// Tile open in the detail view.
    pub fn zoom(&self) -> Option<&Tile> {
        self.zoom.and_then(|key| self.round.tile(key))
    }
}
