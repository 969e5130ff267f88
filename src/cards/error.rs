//! Card fetch error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Longest response body kept in a [`FetchErrorKind::Status`] error.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// What went wrong while fetching cards.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FetchErrorKind {
    /// The request never produced a response.
    #[display("request failed: {_0}")]
    Network(String),
    /// The endpoint answered with a non-success status.
    #[display("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// The body was not a card list.
    #[display("malformed card list: {_0}")]
    Malformed(String),
    /// A local deck file could not be read.
    #[display("unreadable deck file: {_0}")]
    Unreadable(String),
}

/// Card fetch error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Card fetch failed: {}", kind)]
pub struct FetchError {
    /// Failure kind.
    pub kind: FetchErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FetchError {
    /// Creates a new fetch error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: FetchErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates a [`FetchErrorKind::Status`] error, truncating the body.
    #[track_caller]
    pub fn status(status: u16, body: &str) -> Self {
        Self::new(FetchErrorKind::Status {
            status,
            body: truncate_body(body),
        })
    }
}

impl From<reqwest::Error> for FetchError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(FetchErrorKind::Network(err.to_string()))
    }
}

impl From<serde_json::Error> for FetchError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(FetchErrorKind::Malformed(err.to_string()))
    }
}

/// Trims a response body to [`MAX_ERROR_BODY_CHARS`] characters.
pub fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push('…');
    out
}
