//! Wall-clock side of the mismatch cooldown.
//!
//! [`CooldownTimer`] runs at most one countdown at a time. Each countdown is a
//! spawned task that sends its [`CooldownTicket`] on a channel when time is up,
//! unless its cancellation token fires first.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::game::CooldownTicket;

#[derive(Debug)]
enum TimerState {
    Running {
        deadline: Instant,
        token: CancellationToken,
    },
    Paused {
        remaining: Duration,
    },
}

#[derive(Debug)]
struct PendingCooldown {
    ticket: CooldownTicket,
    state: TimerState,
}

/// Schedules, pauses, resumes and cancels cooldown countdowns.
#[derive(Debug)]
pub struct CooldownTimer {
    tx: mpsc::UnboundedSender<CooldownTicket>,
    pending: Option<PendingCooldown>,
}

impl CooldownTimer {
    /// Creates a timer and the receiver its expired tickets arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CooldownTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, pending: None }, rx)
    }

    /// Starts a countdown for `ticket`, cancelling any other.
    #[instrument(skip(self))]
    pub fn schedule(&mut self, ticket: CooldownTicket, duration: Duration) {
        self.cancel();
        let deadline = Instant::now() + duration;
        let token = self.spawn(ticket, deadline);
        self.pending = Some(PendingCooldown {
            ticket,
            state: TimerState::Running { deadline, token },
        });
    }

    /// Stops the countdown for `ticket` and keeps the time left.
    #[instrument(skip(self))]
    pub fn pause(&mut self, ticket: CooldownTicket) -> Option<Duration> {
        let pending = self.pending.as_mut().filter(|p| p.ticket == ticket)?;
        let TimerState::Running { deadline, token } = &pending.state else {
            return None;
        };
        token.cancel();
        let remaining = deadline.saturating_duration_since(Instant::now());
        debug!(remaining_ms = remaining.as_millis() as u64, "Cooldown paused");
        pending.state = TimerState::Paused { remaining };
        Some(remaining)
    }

    /// Restarts a paused countdown for `ticket` from its remaining time.
    #[instrument(skip(self))]
    pub fn resume(&mut self, ticket: CooldownTicket) -> bool {
        let remaining = match &self.pending {
            Some(PendingCooldown {
                ticket: pending,
                state: TimerState::Paused { remaining },
            }) if *pending == ticket => *remaining,
            _ => {
                warn!("No paused cooldown for ticket");
                return false;
            }
        };
        let deadline = Instant::now() + remaining;
        let token = self.spawn(ticket, deadline);
        self.pending = Some(PendingCooldown {
            ticket,
            state: TimerState::Running { deadline, token },
        });
        debug!(remaining_ms = remaining.as_millis() as u64, "Cooldown resumed");
        true
    }

    /// Drops any countdown so its ticket can never be delivered.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let TimerState::Running { token, .. } = pending.state {
                token.cancel();
            }
            debug!(ticket = %pending.ticket, "Cooldown cancelled");
        }
    }

    /// Marks `ticket` as delivered. Returns false if it is not the current countdown.
    pub fn acknowledge(&mut self, ticket: CooldownTicket) -> bool {
        if self.ticket() != Some(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Time left on the current countdown.
    pub fn remaining(&self) -> Option<Duration> {
        match &self.pending.as_ref()?.state {
            TimerState::Running { deadline, .. } => {
                Some(deadline.saturating_duration_since(Instant::now()))
            }
            TimerState::Paused { remaining } => Some(*remaining),
        }
    }

    /// True while the current countdown is paused.
    pub fn is_paused(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingCooldown {
                state: TimerState::Paused { .. },
                ..
            })
        )
    }

    /// Ticket of the current countdown.
    pub fn ticket(&self) -> Option<CooldownTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    fn spawn(&self, ticket: CooldownTicket, deadline: Instant) -> CancellationToken {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = sleep_until(deadline) => {
                    if tx.send(ticket).is_err() {
                        debug!(ticket = %ticket, "Cooldown receiver dropped");
                    }
                }
            }
        });
        token
    }
}

impl Drop for CooldownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
