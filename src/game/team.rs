//! Teams, team colors, and the pre-game team setup.

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One of the two team seats.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    Serialize,
    Deserialize,
)]
pub enum TeamSlot {
    /// Team index 0.
    #[default]
    #[display("Team 1")]
    First,
    /// Team index 1.
    #[display("Team 2")]
    Second,
}

impl TeamSlot {
    /// Both slots in index order.
    pub const ALL: [TeamSlot; 2] = [TeamSlot::First, TeamSlot::Second];

    /// Returns the zero-based team index.
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// Returns the slot for a zero-based index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }

    /// Returns the opposing slot.
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Color used when the configured one is missing or invalid.
    pub fn default_color(self) -> TeamColor {
        match self {
            Self::First => TeamColor::new(0x25, 0x63, 0xeb),
            Self::Second => TeamColor::new(0xdc, 0x26, 0x26),
        }
    }
}

/// An RGB team color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("#{red:02x}{green:02x}{blue:02x}")]
pub struct TeamColor {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl TeamColor {
    /// Creates a color from its channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses exactly six hex digits, with or without a leading `#`.
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parses `input`, falling back to `fallback` when it is not a valid color.
    #[instrument]
    pub fn parse_or(input: &str, fallback: TeamColor) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            debug!(fallback = %fallback, "Invalid team color, using fallback");
            fallback
        })
    }
}

/// A team and its running score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Team {
    name: String,
    color: TeamColor,
    score: u32,
}

impl Team {
    /// Creates a team with a zero score.
    pub fn new(name: impl Into<String>, color: TeamColor) -> Self {
        Self {
            name: name.into(),
            color,
            score: 0,
        }
    }

    pub(crate) fn award_point(&mut self) {
        self.score += 1;
    }

    pub(crate) fn reset_score(&mut self) {
        self.score = 0;
    }
}

/// Raw values from the setup form.
///
/// Names and colors are kept exactly as typed; [`TeamSetup::teams`] normalizes
/// them when a game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSetup {
    /// Team names, by slot index.
    pub names: [String; 2],
    /// Team colors as typed, by slot index.
    pub colors: [String; 2],
    /// Team that takes the first turn.
    pub starting: TeamSlot,
}

impl Default for TeamSetup {
    fn default() -> Self {
        Self {
            names: TeamSlot::ALL.map(|slot| slot.to_string()),
            colors: TeamSlot::ALL.map(|slot| slot.default_color().to_string()),
            starting: TeamSlot::First,
        }
    }
}

impl TeamSetup {
    /// Creates a setup from names, colors, and the starting team.
    pub fn new(names: [&str; 2], colors: [&str; 2], starting: TeamSlot) -> Self {
        Self {
            names: names.map(str::to_string),
            colors: colors.map(str::to_string),
            starting,
        }
    }

    /// Builds both teams with zero scores.
    ///
    /// Blank names become the slot label; invalid colors become the slot default.
    #[instrument(skip(self))]
    pub fn teams(&self) -> [Team; 2] {
        TeamSlot::ALL.map(|slot| {
            let name = self.names[slot.index()].trim();
            let name = if name.is_empty() {
                slot.to_string()
            } else {
                name.to_string()
            };
            let color = TeamColor::parse_or(&self.colors[slot.index()], slot.default_color());
            Team::new(name, color)
        })
    }
}
