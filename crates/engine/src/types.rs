//! Shared types for cross-book prop reconciliation.
//!
//! This module defines the normalized [`Quote`], the identity keys used to
//! line quotes up across sportsbooks, and the small enums shared by the
//! detectors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Qualifier for props that cover the whole game.
pub const FULL_GAME: &str = "Full Game";

/// Sentinel category for prop text that cannot be parsed.
pub const UNKNOWN_PROP: &str = "Unknown Prop";

// =============================================================================
// Side
// =============================================================================

/// Side of a two-way over/under market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Over,
    Under,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Over => Self::Under,
            Self::Under => Self::Over,
        }
    }

    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Over => "Over",
            Self::Under => "Under",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// Sportsbook
// =============================================================================

/// Identifies which sportsbook a quote came from.
///
/// Books order by display name, case-insensitively, so sorted book lists
/// read alphabetically whether or not the book has its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sportsbook {
    DraftKings,
    FanDuel,
    /// Any other book, by its reported name.
    Other(String),
}

impl Sportsbook {
    /// Parses a book name case-insensitively; unknown names are kept verbatim.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        let folded: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "fanduel" | "fd" => Self::FanDuel,
            "draftkings" | "dk" => Self::DraftKings,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DraftKings => "DraftKings",
            Self::FanDuel => "FanDuel",
            Self::Other(name) => name,
        }
    }

    fn folded_name(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_str().bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl Ord for Sportsbook {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // A variant rank keeps Other("FanDuel") distinct from FanDuel.
        let rank = |book: &Self| match book {
            Self::DraftKings | Self::FanDuel => 0u8,
            Self::Other(_) => 1,
        };
        self.folded_name()
            .cmp(other.folded_name())
            .then_with(|| self.as_str().cmp(other.as_str()))
            .then_with(|| rank(self).cmp(&rank(other)))
    }
}

impl PartialOrd for Sportsbook {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Sportsbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Sportsbook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// Identity Keys
// =============================================================================

/// "The same bettable proposition on the same player", independent of
/// sportsbook and line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IdentityKey {
    pub player_key: String,
    pub prop_main: String,
    pub prop_qualifier: String,
}

impl IdentityKey {
    #[must_use]
    pub fn new(player_key: &str, prop_main: &str, prop_qualifier: &str) -> Self {
        Self {
            player_key: player_key.to_string(),
            prop_main: prop_main.to_string(),
            prop_qualifier: prop_qualifier.to_string(),
        }
    }

    /// Returns the display label, e.g. "Passing Yards (1st Half)".
    #[must_use]
    pub fn prop_label(&self) -> String {
        prop_label(&self.prop_main, &self.prop_qualifier)
    }
}

/// An identity scoped to one betting line. An absent line is its own group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineKey {
    pub identity: IdentityKey,
    pub line: Option<Decimal>,
}

/// Formats a canonical prop label: `"Main (Qualifier)"`, or just `"Main"` for
/// full-game and folded markets.
#[must_use]
pub fn prop_label(main: &str, qualifier: &str) -> String {
    if qualifier.is_empty() || qualifier == FULL_GAME {
        main.to_string()
    } else {
        format!("{main} ({qualifier})")
    }
}

// =============================================================================
// Quote
// =============================================================================

/// One sportsbook's offer on one proposition at one point in time.
///
/// Quotes are immutable once built by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub sportsbook: Sportsbook,
    pub game_raw: String,
    /// Team-order independent game key.
    pub game_key: String,
    pub player_raw: String,
    /// Recovered player name for display.
    pub player_display: String,
    pub player_key: String,
    pub prop_type_raw: String,
    pub prop_main: String,
    pub prop_qualifier: String,
    pub line: Option<Decimal>,
    pub over_odds: Option<i32>,
    pub under_odds: Option<i32>,
    pub team_name: Option<String>,
    pub team_logo: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// Returns the cross-book identity of this quote.
    #[must_use]
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(&self.player_key, &self.prop_main, &self.prop_qualifier)
    }

    /// Returns the identity scoped to this quote's line.
    #[must_use]
    pub fn line_key(&self) -> LineKey {
        LineKey {
            identity: self.identity(),
            line: self.line,
        }
    }

    #[must_use]
    pub fn prop_label(&self) -> String {
        prop_label(&self.prop_main, &self.prop_qualifier)
    }

    /// Returns the odds for one side.
    #[must_use]
    pub fn odds(&self, side: Side) -> Option<i32> {
        match side {
            Side::Over => self.over_odds,
            Side::Under => self.under_odds,
        }
    }
}

// =============================================================================
// Game Line
// =============================================================================

/// One book's spread, moneyline and total for a game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLine {
    pub game_raw: String,
    pub game_key: String,
    pub sportsbook: Option<Sportsbook>,
    pub away_team: Option<String>,
    pub home_team: Option<String>,
    pub away_spread_line: Option<Decimal>,
    pub away_spread_odds: Option<i32>,
    pub home_spread_line: Option<Decimal>,
    pub home_spread_odds: Option<i32>,
    pub away_moneyline: Option<i32>,
    pub home_moneyline: Option<i32>,
    pub total_line: Option<Decimal>,
    pub over_odds: Option<i32>,
    pub under_odds: Option<i32>,
    pub observed_at: Option<DateTime<Utc>>,
}
