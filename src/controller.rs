//! Game controller: owns the card store, the session and the cooldown timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::cards::{Card, CardSource, CardStore, FetchError};
use crate::config::GameConfig;
use crate::game::{
    CooldownTicket, GameError, SelectOutcome, Session, TeamSetup, TileKey, build_round,
};
use crate::timer::CooldownTimer;

/// Drives one table of play.
///
/// Every state change goes through here so timer side effects stay in step
/// with the [`Session`]: a mismatch schedules the cooldown, the zoom view
/// pauses and resumes it, and starting over cancels it.
///
/// Card fetches run on their own task; [`GameController::poll_cards`] picks
/// up the result, so the caller stays responsive while a fetch is in flight.
#[derive(Debug)]
pub struct GameController {
    config: GameConfig,
    store: CardStore,
    setup: TeamSetup,
    session: Option<Session>,
    timer: CooldownTimer,
    elapsed: mpsc::UnboundedReceiver<CooldownTicket>,
    fetched_tx: mpsc::UnboundedSender<Result<Vec<Card>, FetchError>>,
    fetched: mpsc::UnboundedReceiver<Result<Vec<Card>, FetchError>>,
}

impl GameController {
    /// Creates a controller. Cards are not fetched until
    /// [`GameController::refresh_cards`] or [`GameController::load_cards`].
    #[instrument(skip(source), fields(source = %source.describe()))]
    pub fn new(source: Box<dyn CardSource>, config: GameConfig) -> Self {
        info!(
            round_size = config.round_size(),
            cooldown_ms = config.cooldown_ms(),
            "Creating game controller"
        );
        let (timer, elapsed) = CooldownTimer::channel();
        let (fetched_tx, fetched) = mpsc::unbounded_channel();
        Self {
            config,
            store: CardStore::new(source),
            setup: TeamSetup::default(),
            session: None,
            timer,
            elapsed,
            fetched_tx,
            fetched,
        }
    }

    /// Starts fetching the card list in the background.
    ///
    /// Returns false if a fetch is already in flight. A running session keeps
    /// its round; the new cards apply from the next round.
    #[instrument(skip(self))]
    pub fn refresh_cards(&mut self) -> bool {
        if self.store.loading() {
            debug!("Card fetch already in flight");
            return false;
        }
        let fetch = self.store.begin_load();
        let tx = self.fetched_tx.clone();
        tokio::spawn(async move {
            if tx.send(fetch.await).is_err() {
                debug!("Card fetch receiver dropped");
            }
        });
        true
    }

    /// Applies a finished background fetch, if there is one.
    pub fn poll_cards(&mut self) -> bool {
        match self.fetched.try_recv() {
            Ok(result) => {
                self.store.finish_load(result);
                true
            }
            Err(_) => false,
        }
    }

    /// Fetches the card list and waits for the result.
    pub async fn load_cards(&mut self) {
        self.refresh_cards();
        if let Some(result) = self.fetched.recv().await {
            self.store.finish_load(result);
        }
    }

    /// Builds a round and starts a session with `setup`.
    ///
    /// # Errors
    ///
    /// Fails if the last fetch failed or there are not enough usable cards.
    /// The current session, if any, is left untouched on failure.
    #[instrument(skip(self, setup))]
    pub fn start_game(&mut self, setup: TeamSetup) -> Result<(), GameError> {
        let round = self.build_round()?;
        self.timer.cancel();
        self.session = Some(Session::new(setup.teams(), setup.starting, round));
        self.setup = setup;
        info!("Game started");
        Ok(())
    }

    /// Deals a fresh round for the same teams and zeroes the scores.
    ///
    /// Without a session this starts one from the last setup.
    ///
    /// # Errors
    ///
    /// Same as [`GameController::start_game`]; state is untouched on failure.
    #[instrument(skip(self))]
    pub fn new_round(&mut self) -> Result<(), GameError> {
        if self.session.is_none() {
            debug!("No session, starting from last setup");
            return self.start_game(self.setup.clone());
        }
        let round = self.build_round()?;
        self.timer.cancel();
        if let Some(session) = self.session.as_mut() {
            session.restart(round);
        }
        Ok(())
    }

    /// Ends the session and returns to team setup.
    #[instrument(skip(self))]
    pub fn change_teams(&mut self) {
        self.timer.cancel();
        if self.session.take().is_some() {
            info!("Session discarded");
        }
    }

    /// Clicks the tile at `key`. Returns `None` when no game is running.
    #[instrument(skip(self))]
    pub fn select(&mut self, key: TileKey) -> Option<SelectOutcome> {
        let outcome = self.session.as_mut()?.select(key);
        match &outcome {
            SelectOutcome::Mismatched { ticket } => {
                self.timer.schedule(*ticket, self.config.cooldown());
            }
            SelectOutcome::ZoomOpened {
                paused: Some(ticket),
                ..
            } => {
                self.timer.pause(*ticket);
            }
            SelectOutcome::ZoomClosed {
                resumed: Some(ticket),
            } => {
                self.timer.resume(*ticket);
            }
            _ => {}
        }
        Some(outcome)
    }

    /// Closes the detail view, resuming a paused cooldown.
    #[instrument(skip(self))]
    pub fn close_zoom(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(ticket) = session.close_zoom() {
            self.timer.resume(ticket);
        }
    }

    /// Applies every cooldown that has expired. Returns how many took effect.
    pub fn drain_elapsed(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(ticket) = self.elapsed.try_recv() {
            if self.apply_elapsed(ticket) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next expired cooldown and applies it.
    ///
    /// Returns whether the ticket was still current.
    pub async fn next_elapsed(&mut self) -> Option<bool> {
        let ticket = self.elapsed.recv().await?;
        Some(self.apply_elapsed(ticket))
    }

    fn apply_elapsed(&mut self, ticket: CooldownTicket) -> bool {
        if !self.timer.acknowledge(ticket) {
            warn!(ticket = %ticket, "Dropping cooldown the timer no longer tracks");
            return false;
        }
        match self.session.as_mut() {
            Some(session) => session.expire_cooldown(ticket),
            None => false,
        }
    }

    fn build_round(&self) -> Result<crate::game::Round, GameError> {
        if let Some(err) = self.store.error() {
            return Err(err.clone().into());
        }
        Ok(build_round(
            self.store.cards(),
            *self.config.round_size(),
            &mut rand::rng(),
        )?)
    }

    /// Time left on the mismatch cooldown.
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        self.timer.remaining()
    }

    /// True while the zoom view holds the cooldown.
    pub fn cooldown_paused(&self) -> bool {
        self.timer.is_paused()
    }

    /// The running session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Loaded cards.
    pub fn store(&self) -> &CardStore {
        &self.store
    }

    /// Team setup of the current or last game.
    pub fn setup(&self) -> &TeamSetup {
        &self.setup
    }

    /// Game parameters.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
