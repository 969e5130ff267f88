//! Card list loading.

mod card;
mod error;
mod source;
mod store;

pub use card::{Card, CardsPayload};
pub use error::{FetchError, FetchErrorKind, MAX_ERROR_BODY_CHARS, truncate_body};
pub use source::{
    CARDS_PATH, CardSource, DEFAULT_API_BASE, FileCardSource,
    HttpCardSource, StaticCardSource,
};
pub use store::CardStore;
