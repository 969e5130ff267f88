//! Loaded card state: `{cards, loading, error}`.

use std::future::Future;
use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, instrument, warn};

use super::card::Card;
use super::error::FetchError;
use super::source::CardSource;

/// Holds the result of the most recent fetch from a [`CardSource`].
///
/// A failed fetch leaves an empty card list next to the error, so partial
/// data is never presented as a successful load.
///
/// A fetch is split in two so it can run off the owner's task:
/// [`CardStore::begin_load`] marks the store as loading and hands out a
/// detached future, and [`CardStore::finish_load`] stores its result.
pub struct CardStore {
    source: Arc<dyn CardSource>,
    cards: Vec<Card>,
    loading: bool,
    loaded: bool,
    error: Option<FetchError>,
}

impl std::fmt::Debug for CardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardStore")
            .field("source", &self.source.describe())
            .field("cards", &self.cards.len())
            .field("loading", &self.loading)
            .field("loaded", &self.loaded)
            .field("error", &self.error)
            .finish()
    }
}

impl CardStore {
    /// Creates an empty store. Nothing is fetched until [`CardStore::load`]
    /// or [`CardStore::begin_load`].
    pub fn new(source: Box<dyn CardSource>) -> Self {
        Self {
            source: Arc::from(source),
            cards: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
        }
    }

    /// Marks the store as loading and returns the fetch to run.
    ///
    /// The future does not borrow the store; hand its output to
    /// [`CardStore::finish_load`].
    pub fn begin_load(
        &mut self,
    ) -> impl Future<Output = Result<Vec<Card>, FetchError>> + Send + use<> {
        let span = info_span!("begin_load", source = %self.source.describe());
        let _enter = span.enter();
        debug!("Card fetch started");
        self.loading = true;
        let source = Arc::clone(&self.source);
        async move { source.fetch_cards().await }.instrument(span.clone())
    }

    /// Stores the outcome of a fetch started with [`CardStore::begin_load`],
    /// replacing whatever was loaded before.
    #[instrument(skip(self, result))]
    pub fn finish_load(&mut self, result: Result<Vec<Card>, FetchError>) {
        self.loading = false;
        self.loaded = true;

        match result {
            Ok(cards) => {
                info!(count = cards.len(), "Card store updated");
                self.cards = cards;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, file = e.file, line = e.line, "Card fetch failed");
                self.cards.clear();
                self.error = Some(e);
            }
        }
    }

    /// Fetches the card list in place.
    pub async fn load(&mut self) {
        let fetch = self.begin_load();
        let result = fetch.await;
        self.finish_load(result);
    }

    /// Re-issues the fetch.
    pub async fn refresh(&mut self) {
        self.load().await;
    }

    /// Cards from the last successful fetch.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// True while a fetch is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True once at least one fetch has completed.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Error from the last fetch, if it failed.
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Where the cards come from.
    pub fn describe(&self) -> String {
        self.source.describe()
    }
}
