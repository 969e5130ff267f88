//! Application configuration: card endpoint and game parameters.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::cards::DEFAULT_API_BASE;
use crate::game::DEFAULT_ROUND_SIZE;

/// Environment variable holding the card endpoint base URL.
pub const API_BASE_ENV: &str = "TRIVIA_API_BASE";

/// Config file read when no `--config` is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "trivia_match.toml";

/// Default mismatch cooldown.
pub const DEFAULT_COOLDOWN_MS: u64 = 5000;

/// Round size and mismatch cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pairs per round.
    #[serde(default = "default_round_size")]
    round_size: usize,

    /// How long a wrong pair stays visible, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    cooldown_ms: u64,
}

fn default_round_size() -> usize {
    DEFAULT_ROUND_SIZE
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_size: default_round_size(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl GameConfig {
    /// Creates a game configuration.
    pub fn new(round_size: usize, cooldown_ms: u64) -> Self {
        Self {
            round_size,
            cooldown_ms,
        }
    }

    /// Mismatch cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the card endpoint.
    #[serde(default = "default_api_base")]
    api_base: String,

    /// Game parameters.
    #[serde(default)]
    game: GameConfig,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            game: GameConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(api_base = %config.api_base, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else defaults.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Overrides the card endpoint base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Overrides the round size.
    pub fn with_round_size(mut self, round_size: usize) -> Result<Self, ConfigError> {
        self.game.round_size = round_size;
        self.validate()?;
        Ok(self)
    }

    /// Overrides the mismatch cooldown.
    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.game.cooldown_ms = cooldown_ms;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.game.round_size == 0 {
            return Err(ConfigError::new("round_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
