//! Card sources: the remote card-list endpoint, local deck files, and fixed lists.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::card::{Card, CardsPayload};
use super::error::{FetchError, FetchErrorKind};

/// Default base URL of the card-list endpoint.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Path of the card list, relative to the base URL.
pub const CARDS_PATH: &str = "/api/cards";

/// Anything that can produce the full card list.
#[async_trait::async_trait]
pub trait CardSource: Send + Sync {
    /// Fetches every available card.
    async fn fetch_cards(&self) -> Result<Vec<Card>, FetchError>;

    /// Human-readable origin, shown in the UI.
    fn describe(&self) -> String;
}

/// Fetches cards from `GET {base_url}/api/cards`.
#[derive(Debug, Clone)]
pub struct HttpCardSource {
    base_url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpCardSource {
    /// Creates a source for the given base URL. A trailing `/` is ignored.
    #[instrument(skip(base_url))]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Creating HTTP card source");
        Self {
            base_url,
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Fails requests that take longer than `timeout` as network errors.
    ///
    /// Without one a request waits as long as the endpoint does.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of the card list.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CARDS_PATH)
    }
}

#[async_trait::async_trait]
impl CardSource for HttpCardSource {
    #[instrument(skip(self), fields(url = %self.endpoint()))]
    async fn fetch_cards(&self) -> Result<Vec<Card>, FetchError> {
        info!("Fetching cards");

        let mut request = self.client.get(self.endpoint());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, "Card endpoint returned an error status");
            return Err(FetchError::status(status.as_u16(), &body));
        }

        let payload: CardsPayload = serde_json::from_str(&body)?;
        if payload.count != payload.cards.len() {
            warn!(
                reported = payload.count,
                received = payload.cards.len(),
                "Card count disagrees with card list"
            );
        }

        info!(count = payload.cards.len(), "Cards fetched");
        Ok(payload.cards)
    }

    fn describe(&self) -> String {
        self.endpoint()
    }
}

/// Reads cards from a JSON file shaped like the endpoint's response.
///
/// The file is re-read on every fetch, so a refresh picks up edits.
#[derive(Debug, Clone)]
pub struct FileCardSource {
    path: PathBuf,
}

impl FileCardSource {
    /// Creates a source for the given deck file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CardSource for FileCardSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_cards(&self) -> Result<Vec<Card>, FetchError> {
        debug!("Reading deck file");
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::new(FetchErrorKind::Unreadable(e.to_string())))?;
        let payload: CardsPayload = serde_json::from_str(&content)?;
        info!(count = payload.cards.len(), "Deck file loaded");
        Ok(payload.cards)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a fixed card list.
#[derive(Debug, Clone, Default)]
pub struct StaticCardSource {
    cards: Vec<Card>,
}

impl StaticCardSource {
    /// Creates a source that always returns `cards`.
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

#[async_trait::async_trait]
impl CardSource for StaticCardSource {
    async fn fetch_cards(&self) -> Result<Vec<Card>, FetchError> {
        Ok(self.cards.clone())
    }

    fn describe(&self) -> String {
        format!("{} built-in cards", self.cards.len())
    }
}
