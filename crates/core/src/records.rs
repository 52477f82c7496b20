//! Raw records emitted by the sportsbook scrapers.
//!
//! These are the ingestion interface of the engine: every field is kept as
//! the scraper wrote it. Odds and lines stay textual because books disagree
//! on formatting (Unicode minus, "N/A", floats written by dataframe exports),
//! and the engine owns turning them into numbers.

use serde::{Deserialize, Deserializer, Serialize};

/// One scraped player-prop quote, in either the legacy single-snapshot shape
/// (no `scrape_timestamp`) or the history shape (with it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawQuote {
    /// Sportsbook that emitted the quote (e.g. "FanDuel").
    pub sportsbook: String,
    /// Game as the book names it, e.g. "KC Chiefs @ BUF Bills".
    #[serde(default)]
    pub game: String,
    /// Player name, possibly corrupted with a trailing prop description.
    #[serde(default, alias = "player")]
    pub player_name: String,
    /// Free-text prop type or category tab.
    #[serde(default)]
    pub prop_type: String,
    /// Betting line.
    #[serde(default, deserialize_with = "text_or_number")]
    pub line: Option<String>,
    /// American odds for the over side.
    #[serde(default, deserialize_with = "text_or_number")]
    pub over_odds: Option<String>,
    /// American odds for the under side.
    #[serde(default, deserialize_with = "text_or_number")]
    pub under_odds: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub team_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub team_logo: Option<String>,
    /// When the record was scraped; absent in legacy feeds.
    #[serde(default, deserialize_with = "text_or_number")]
    pub scrape_timestamp: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub week: Option<String>,
}

impl RawQuote {
    /// Creates a quote record with the fields every scraper emits.
    #[must_use]
    pub fn new(
        sportsbook: impl Into<String>,
        game: impl Into<String>,
        player_name: impl Into<String>,
        prop_type: impl Into<String>,
    ) -> Self {
        Self {
            sportsbook: sportsbook.into(),
            game: game.into(),
            player_name: player_name.into(),
            prop_type: prop_type.into(),
            ..Self::default()
        }
    }

    /// Sets the line.
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = Some(line.into());
        self
    }

    /// Sets both sides' odds.
    #[must_use]
    pub fn with_odds(mut self, over: impl Into<String>, under: impl Into<String>) -> Self {
        self.over_odds = Some(over.into());
        self.under_odds = Some(under.into());
        self
    }

    /// Sets the over odds only.
    #[must_use]
    pub fn with_over_odds(mut self, over: impl Into<String>) -> Self {
        self.over_odds = Some(over.into());
        self
    }

    /// Sets the team name.
    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team_name = Some(team.into());
        self
    }

    /// Sets the scrape timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.scrape_timestamp = Some(timestamp.into());
        self
    }
}

/// One scraped game-line record (spread, moneyline, total).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawGameLine {
    #[serde(default)]
    pub game: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub sportsbook: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub away_team: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub home_team: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub away_spread_line: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub away_spread_odds: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub home_spread_line: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub home_spread_odds: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub away_moneyline: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub home_moneyline: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub total_line: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub over_odds: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub under_odds: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub scrape_timestamp: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts a string, an integer or a float and keeps it as text.
///
/// JSON scrapers write odds as numbers, CSV exports as strings; blank text is
/// treated as missing.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(TextOrNumber::Int(v)) => Some(v.to_string()),
        Some(TextOrNumber::Float(v)) => Some(v.to_string()),
        Some(TextOrNumber::Text(s)) if s.trim().is_empty() => None,
        Some(TextOrNumber::Text(s)) => Some(s),
        None => None,
    })
}
