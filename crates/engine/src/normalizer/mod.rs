//! Canonicalization of raw scraper records.
//!
//! Every sportsbook names players, games and props differently. The
//! [`Normalizer`] turns a [`RawQuote`] into a [`Quote`] whose keys line up
//! across books:
//!
//! - [`name`]: player keys and corrupted-name recovery
//! - [`game`]: canonical team names and orientation-independent game keys
//! - [`prop`]: prop text into `(prop_main, prop_qualifier)`
//!
//! Normalization never fails. Unparseable fields degrade to a best-effort
//! canonical value (or `None`) and are logged at `debug`.

pub mod game;
pub mod name;
pub mod prop;

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use propline_core::{AppConfig, NormalizerTables, QualifierMarker, RawGameLine, RawQuote};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

pub use game::{canonical_team, game_key, split_matchup};
pub use name::{player_key, NameResolution, NameResolver, PassthroughResolver, PrefixNameResolver};
pub use prop::{category_context, parse_prop, PropKey};

use crate::odds::parse_american_odds;
use crate::types::{GameLine, Quote, Sportsbook};

/// Placeholder some scrapers write when a player's team is not known.
const UNKNOWN_TEAM: &str = "Unknown Team";

/// Textual placeholders for a missing line.
const MISSING_LINE: [&str; 3] = ["n/a", "na", "-"];

/// Largest line magnitude accepted; anything beyond is a scrape error.
pub const MAX_LINE_MAGNITUDE: Decimal = dec!(100000);

/// Naive timestamp layouts written by the scrapers, read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// =============================================================================
// Normalizer
// =============================================================================

/// Converts raw records into normalized quotes.
///
/// Tables are fixed at construction; the normalizer holds no mutable state
/// and can be shared across threads.
#[derive(Debug)]
pub struct Normalizer {
    tables: NormalizerTables,
    markers: Vec<QualifierMarker>,
    resolver: Box<dyn NameResolver>,
    trusted: Sportsbook,
}

impl Normalizer {
    /// Creates a normalizer over `tables` using `resolver` for player names.
    ///
    /// The trusted sportsbook defaults to FanDuel.
    #[must_use]
    pub fn new(tables: &NormalizerTables, resolver: Box<dyn NameResolver>) -> Self {
        let markers = tables.markers_by_precedence().into_iter().cloned().collect();
        Self {
            tables: tables.clone(),
            markers,
            resolver,
            trusted: Sportsbook::FanDuel,
        }
    }

    /// Creates a normalizer from application config, with a prefix resolver
    /// that learns names from the configured trusted sportsbook.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let resolver = PrefixNameResolver::new(
            std::iter::empty::<&str>(),
            &config.normalizer.generational_suffixes,
        );
        Self::new(&config.normalizer, Box::new(resolver))
            .with_trusted_sportsbook(Sportsbook::from_name(&config.trusted_sportsbook))
    }

    /// Creates a normalizer with the built-in tables.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_config(&AppConfig::default())
    }

    /// Sets the sportsbook whose player names are trusted as clean.
    #[must_use]
    pub fn with_trusted_sportsbook(mut self, trusted: Sportsbook) -> Self {
        self.trusted = trusted;
        self
    }

    /// Returns the lookup tables.
    #[must_use]
    pub fn tables(&self) -> &NormalizerTables {
        &self.tables
    }

    /// Returns the trusted sportsbook.
    #[must_use]
    pub fn trusted_sportsbook(&self) -> &Sportsbook {
        &self.trusted
    }

    /// Folds a player name into its matching key.
    #[must_use]
    pub fn player_key(&self, raw: &str) -> String {
        player_key(raw, &self.tables.generational_suffixes)
    }

    /// Builds the orientation-independent game key.
    #[must_use]
    pub fn game_key(&self, raw: &str) -> String {
        game_key(raw, &self.tables.team_aliases)
    }

    /// Expands a team name to its canonical full name.
    #[must_use]
    pub fn canonical_team(&self, raw: &str) -> String {
        canonical_team(raw, &self.tables.team_aliases)
    }

    /// Parses prop text, optionally within a stat-family context.
    #[must_use]
    pub fn parse_prop(&self, text: &str, context: Option<&str>) -> PropKey {
        parse_prop(text, context, &self.tables, &self.markers)
    }

    /// Normalizes one record with the configured resolver.
    #[must_use]
    pub fn normalize_quote(&self, raw: &RawQuote) -> Quote {
        self.normalize_with(raw, self.resolver.as_ref())
    }

    /// Normalizes a batch of records.
    ///
    /// Clean names from the trusted sportsbook's records are harvested first
    /// so corrupted player fields in the same batch can be recovered.
    #[must_use]
    pub fn normalize_all(&self, records: &[RawQuote]) -> Vec<Quote> {
        let harvested = self.resolver.harvest(records, &self.trusted);
        let resolver = harvested.as_deref().unwrap_or(self.resolver.as_ref());
        records
            .iter()
            .map(|raw| self.normalize_with(raw, resolver))
            .collect()
    }

    fn normalize_with(&self, raw: &RawQuote, resolver: &dyn NameResolver) -> Quote {
        let sportsbook = Sportsbook::from_name(&raw.sportsbook);
        let resolution = resolver.resolve(&raw.player_name);
        let context = category_context(&raw.prop_type, &self.tables);

        // Category tabs and blank prop types mean the prop lives in the
        // player field, after the recovered name.
        let prop_text = match (context, resolution.remainder.as_deref()) {
            (Some(_), Some(rest)) => rest,
            (None, Some(rest)) if raw.prop_type.trim().is_empty() => rest,
            _ => raw.prop_type.as_str(),
        };
        let prop = self.parse_prop(prop_text, context);

        if !resolution.resolved {
            debug!(
                sportsbook = %sportsbook,
                player_raw = %raw.player_name,
                "Player name not recovered, using raw text"
            );
        }

        Quote {
            game_key: self.game_key(&raw.game),
            game_raw: raw.game.clone(),
            player_key: self.player_key(&resolution.name),
            player_display: resolution.name,
            player_raw: raw.player_name.clone(),
            prop_type_raw: raw.prop_type.clone(),
            prop_main: prop.main,
            prop_qualifier: prop.qualifier,
            line: parse_line(raw.line.as_deref()),
            over_odds: raw.over_odds.as_deref().and_then(parse_american_odds),
            under_odds: raw.under_odds.as_deref().and_then(parse_american_odds),
            team_name: self.team_name(raw.team_name.as_deref()),
            team_logo: non_blank(raw.team_logo.as_deref()),
            observed_at: parse_timestamp(raw.scrape_timestamp.as_deref()),
            sportsbook,
        }
    }

    /// Normalizes one game-line record.
    #[must_use]
    pub fn normalize_game_line(&self, raw: &RawGameLine) -> GameLine {
        let odds = |text: &Option<String>| text.as_deref().and_then(parse_american_odds);
        GameLine {
            game_key: self.game_key(&raw.game),
            game_raw: raw.game.clone(),
            sportsbook: non_blank(raw.sportsbook.as_deref()).map(|b| Sportsbook::from_name(&b)),
            away_team: self.team_name(raw.away_team.as_deref()),
            home_team: self.team_name(raw.home_team.as_deref()),
            away_spread_line: parse_line(raw.away_spread_line.as_deref()),
            away_spread_odds: odds(&raw.away_spread_odds),
            home_spread_line: parse_line(raw.home_spread_line.as_deref()),
            home_spread_odds: odds(&raw.home_spread_odds),
            away_moneyline: odds(&raw.away_moneyline),
            home_moneyline: odds(&raw.home_moneyline),
            total_line: parse_line(raw.total_line.as_deref()),
            over_odds: odds(&raw.over_odds),
            under_odds: odds(&raw.under_odds),
            observed_at: parse_timestamp(raw.scrape_timestamp.as_deref()),
        }
    }

    fn team_name(&self, raw: Option<&str>) -> Option<String> {
        non_blank(raw)
            .filter(|team| !team.eq_ignore_ascii_case(UNKNOWN_TEAM))
            .map(|team| self.canonical_team(&team))
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

// =============================================================================
// Field Parsers
// =============================================================================

/// Parses a betting line.
///
/// "N/A", blanks, non-numeric text and values beyond
/// [`MAX_LINE_MAGNITUDE`] yield `None`. Values are normalized so "5.50" and
/// "5.5" are the same line.
#[must_use]
pub fn parse_line(text: Option<&str>) -> Option<Decimal> {
    let cleaned = text?.trim().replace('\u{2212}', "-");
    if cleaned.is_empty() || MISSING_LINE.contains(&cleaned.to_ascii_lowercase().as_str()) {
        return None;
    }
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    match Decimal::from_str(cleaned) {
        Ok(line) if line.abs() <= MAX_LINE_MAGNITUDE => Some(line.normalize()),
        Ok(line) => {
            debug!(line = %line, "Out-of-range line treated as absent");
            None
        }
        Err(_) => {
            debug!(line = %cleaned, "Unparseable line treated as absent");
            None
        }
    }
}

/// Parses a scrape timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (read as UTC). Anything else yields
/// `None`.
#[must_use]
pub fn parse_timestamp(text: Option<&str>) -> Option<DateTime<Utc>> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    let parsed = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc());
    if parsed.is_none() {
        debug!(timestamp = %text, "Unparseable timestamp treated as absent");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::types::FULL_GAME;

    fn normalizer() -> Normalizer {
        Normalizer::with_defaults()
    }

    // ==================== Field Parser Tests ====================

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(Some("5.5")), Some(dec!(5.5)));
        assert_eq!(parse_line(Some("5.50")), parse_line(Some("5.5")));
        assert_eq!(parse_line(Some(" -3.5 ")), Some(dec!(-3.5)));
        assert_eq!(parse_line(Some("\u{2212}3.5")), Some(dec!(-3.5)));
        assert_eq!(parse_line(Some("+7")), Some(dec!(7)));
        assert_eq!(parse_line(Some("N/A")), None);
        assert_eq!(parse_line(Some("")), None);
        assert_eq!(parse_line(Some("over")), None);
        assert_eq!(parse_line(None), None);
    }

    #[test]
    fn test_parse_line_out_of_range() {
        assert_eq!(parse_line(Some("100000")), Some(dec!(100000)));
        assert_eq!(parse_line(Some("-100000.5")), None);
        assert_eq!(parse_line(Some("79228162514264337593543950335")), None);
        assert_eq!(parse_line(Some("-79228162514264337593543950335")), None);
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2025, 10, 12, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp(Some("2025-10-12T09:00:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2025-10-12 09:00:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2025-10-12T09:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(Some("2025-10-12T05:00:00-04:00")), Some(expected));
        assert!(parse_timestamp(Some("2025-10-12T09:00:00.123456")).is_some());
        assert_eq!(parse_timestamp(Some("yesterday")), None);
        assert_eq!(parse_timestamp(None), None);
    }

    // ==================== Quote Normalization Tests ====================

    #[test]
    fn test_normalize_clean_quote() {
        let raw = RawQuote::new("FanDuel", "KC Chiefs @ BUF Bills", "Patrick Mahomes", "1st Half Pass Yds")
            .with_line("134.5")
            .with_odds("-115", "\u{2212}105")
            .with_team("KC Chiefs")
            .with_timestamp("2025-10-12T09:00:00");

        let quote = normalizer().normalize_quote(&raw);
        assert_eq!(quote.sportsbook, Sportsbook::FanDuel);
        assert_eq!(quote.game_key, "Buffalo Bills @ Kansas City Chiefs");
        assert_eq!(quote.player_key, "patrick mahomes");
        assert_eq!(quote.player_display, "Patrick Mahomes");
        assert_eq!(quote.prop_main, "Passing Yards");
        assert_eq!(quote.prop_qualifier, "1st Half");
        assert_eq!(quote.line, Some(dec!(134.5)));
        assert_eq!(quote.over_odds, Some(-115));
        assert_eq!(quote.under_odds, Some(-105));
        assert_eq!(quote.team_name.as_deref(), Some("Kansas City Chiefs"));
        assert!(quote.observed_at.is_some());
    }

    #[test]
    fn test_normalize_unknown_team_and_bad_odds() {
        let raw = RawQuote::new("DraftKings", "A @ B", "John Smith", "Receptions")
            .with_odds("N/A", "-40")
            .with_team("Unknown Team");

        let quote = normalizer().normalize_quote(&raw);
        assert!(quote.team_name.is_none());
        assert!(quote.over_odds.is_none());
        assert!(quote.under_odds.is_none());
        assert!(quote.line.is_none());
        assert!(quote.observed_at.is_none());
    }

    #[test]
    fn test_normalize_all_recovers_corrupted_names() {
        let records = vec![
            RawQuote::new("FanDuel", "A @ B", "John Smith Jr.", "Passing Yds").with_line("249.5"),
            RawQuote::new("DraftKings", "A @ B", "John Smith Jr. Pass Yds O/U", "Passing Props")
                .with_line("259.5"),
            RawQuote::new("DraftKings", "A @ B", "John Smith Jr. Yds", "Passing Props"),
        ];

        let quotes = normalizer().normalize_all(&records);
        assert_eq!(quotes[1].player_display, "John Smith Jr.");
        assert_eq!(quotes[1].player_key, quotes[0].player_key);
        assert_eq!(quotes[1].prop_main, "Passing Yards");
        assert_eq!(quotes[1].prop_qualifier, FULL_GAME);
        assert_eq!(quotes[1].identity(), quotes[0].identity());
        // Bare "Yds" resolves through the "Passing Props" tab
        assert_eq!(quotes[2].identity(), quotes[0].identity());
    }

    #[test]
    fn test_normalize_degraded_mode_keeps_raw_name() {
        let records = vec![RawQuote::new(
            "DraftKings",
            "A @ B",
            "Nobody Known Pass Yds O/U",
            "Passing Props",
        )];

        let quotes = normalizer().normalize_all(&records);
        assert_eq!(quotes[0].player_display, "Nobody Known Pass Yds O/U");
        assert_eq!(quotes[0].player_key, "nobody known pass yds o u");
    }

    #[test]
    fn test_single_quote_without_harvest_is_unresolved() {
        let raw = RawQuote::new("DraftKings", "A @ B", "John Smith Pass Yds", "Passing Props");
        let quote = normalizer().normalize_quote(&raw);
        assert_eq!(quote.player_display, "John Smith Pass Yds");
    }

    #[test]
    fn test_passthrough_resolver_uses_prop_type() {
        let normalizer = Normalizer::new(&NormalizerTables::default(), Box::new(PassthroughResolver));
        let quote = normalizer.normalize_quote(&RawQuote::new("FanDuel", "A @ B", "Josh Allen", "Rush Yds"));
        assert_eq!(quote.player_display, "Josh Allen");
        assert_eq!(quote.prop_main, "Rushing Yards");
    }

    #[test]
    fn test_trusted_sportsbook_from_config() {
        let mut config = AppConfig::default();
        config.trusted_sportsbook = "DraftKings".to_string();
        let normalizer = Normalizer::from_config(&config);
        assert_eq!(normalizer.trusted_sportsbook(), &Sportsbook::DraftKings);
    }

    // ==================== Game Line Tests ====================

    #[test]
    fn test_normalize_game_line() {
        let raw = RawGameLine {
            game: "KC Chiefs @ BUF Bills".to_string(),
            sportsbook: Some("FanDuel".to_string()),
            away_team: Some("KC Chiefs".to_string()),
            home_team: Some("BUF Bills".to_string()),
            away_spread_line: Some("+2.5".to_string()),
            away_spread_odds: Some("-110".to_string()),
            home_spread_line: Some("-2.5".to_string()),
            home_spread_odds: Some("-110".to_string()),
            away_moneyline: Some("+120".to_string()),
            home_moneyline: Some("\u{2212}140".to_string()),
            total_line: Some("47.5".to_string()),
            over_odds: Some("-108".to_string()),
            under_odds: Some("-112".to_string()),
            scrape_timestamp: None,
        };

        let line = normalizer().normalize_game_line(&raw);
        assert_eq!(line.game_key, "Buffalo Bills @ Kansas City Chiefs");
        assert_eq!(line.sportsbook, Some(Sportsbook::FanDuel));
        assert_eq!(line.away_team.as_deref(), Some("Kansas City Chiefs"));
        assert_eq!(line.away_spread_line, Some(dec!(2.5)));
        assert_eq!(line.home_moneyline, Some(-140));
        assert_eq!(line.total_line, Some(dec!(47.5)));
    }
}
