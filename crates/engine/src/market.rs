//! Cross-book market view for display.
//!
//! Nests the current market as game -> team -> player -> prop -> qualifier
//! -> line, with every known sportsbook's prices side by side:
//!
//! ```text
//! Buffalo Bills @ Kansas City Chiefs
//!   Kansas City Chiefs
//!     Patrick Mahomes
//!       Passing Yards / Full Game
//!         274.5   DraftKings -110/-110   FanDuel -115/-105
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::odds::format_american_odds;
use crate::store::QuoteStore;
use crate::types::{GameLine, Quote, Sportsbook};

/// One book's prices on one line. Both sides are `None` when the book does
/// not quote the line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookOdds {
    pub over_odds: Option<i32>,
    pub under_odds: Option<i32>,
    pub over_display: Option<String>,
    pub under_display: Option<String>,
}

impl BookOdds {
    fn from_quote(quote: &Quote) -> Self {
        Self {
            over_odds: quote.over_odds,
            under_odds: quote.under_odds,
            over_display: quote.over_odds.map(format_american_odds),
            under_display: quote.under_odds.map(format_american_odds),
        }
    }

    /// True if the book prices at least one side.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.over_odds.is_some() || self.under_odds.is_some()
    }
}

/// Prices for one line across all books.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEntry {
    pub line: Option<Decimal>,
    pub odds: BTreeMap<Sportsbook, BookOdds>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerEntry {
    pub name: String,
    /// prop_main -> qualifier -> lines (ascending, absent line last).
    pub props: BTreeMap<String, BTreeMap<String, Vec<LineEntry>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamEntry {
    pub logo: Option<String>,
    /// Keyed by player key.
    pub players: BTreeMap<String, PlayerEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameEntry {
    pub game_line: Option<GameLine>,
    pub teams: BTreeMap<String, TeamEntry>,
}

/// The current market, nested for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketView {
    pub sportsbooks: Vec<Sportsbook>,
    pub games: BTreeMap<String, GameEntry>,
}

impl MarketView {
    /// Builds the view from the store's current market.
    ///
    /// Quotes missing a game, team or player are left out. The first game
    /// line per game key is attached to that game.
    #[must_use]
    pub fn build(store: &QuoteStore, game_lines: &[GameLine]) -> Self {
        let sportsbooks = store.sportsbooks();

        // Lines gathered in a map first, then flattened into sorted vectors.
        type LineMap = BTreeMap<Option<Decimal>, BTreeMap<Sportsbook, BookOdds>>;
        let mut staged: BTreeMap<String, BTreeMap<String, TeamEntry>> = BTreeMap::new();
        let mut lines: BTreeMap<(String, String, String, String, String), LineMap> =
            BTreeMap::new();
        let mut skipped = 0usize;

        for quote in store.latest_per_book_line_identity() {
            let Some(team) = quote.team_name.as_deref() else {
                skipped += 1;
                continue;
            };
            if quote.game_key.is_empty() || quote.player_key.is_empty() {
                skipped += 1;
                continue;
            }

            let team_entry = staged
                .entry(quote.game_key.clone())
                .or_default()
                .entry(team.to_string())
                .or_default();
            if team_entry.logo.is_none() {
                team_entry.logo.clone_from(&quote.team_logo);
            }
            team_entry
                .players
                .entry(quote.player_key.clone())
                .or_insert_with(|| PlayerEntry {
                    name: quote.player_display.clone(),
                    props: BTreeMap::new(),
                });

            lines
                .entry((
                    quote.game_key.clone(),
                    team.to_string(),
                    quote.player_key.clone(),
                    quote.prop_main.clone(),
                    quote.prop_qualifier.clone(),
                ))
                .or_default()
                .entry(quote.line)
                .or_insert_with(|| {
                    sportsbooks
                        .iter()
                        .map(|book| (book.clone(), BookOdds::default()))
                        .collect()
                })
                .insert(quote.sportsbook.clone(), BookOdds::from_quote(quote));
        }

        for ((game, team, player, main, qualifier), by_line) in lines {
            let mut entries: Vec<LineEntry> = by_line
                .into_iter()
                .map(|(line, odds)| LineEntry { line, odds })
                .collect();
            entries.sort_by_key(|e| (e.line.is_none(), e.line));

            if let Some(player_entry) = staged
                .get_mut(&game)
                .and_then(|teams| teams.get_mut(&team))
                .and_then(|team| team.players.get_mut(&player))
            {
                player_entry
                    .props
                    .entry(main)
                    .or_default()
                    .insert(qualifier, entries);
            }
        }

        let mut games: BTreeMap<String, GameEntry> = staged
            .into_iter()
            .map(|(game, teams)| {
                (
                    game,
                    GameEntry {
                        game_line: None,
                        teams,
                    },
                )
            })
            .collect();

        for game_line in game_lines {
            if let Some(entry) = games.get_mut(&game_line.game_key) {
                if entry.game_line.is_none() {
                    entry.game_line = Some(game_line.clone());
                }
            }
        }

        debug!(
            games = games.len(),
            skipped_quotes = skipped,
            "Built market view"
        );
        Self { sportsbooks, games }
    }

    /// Number of games in the view.
    #[must_use]
    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Normalizer;
    use crate::types::FULL_GAME;
    use propline_core::{RawGameLine, RawQuote};
    use rust_decimal_macros::dec;

    const GAME: &str = "KC Chiefs @ BUF Bills";

    fn quote(book: &str, player: &str, line: &str) -> RawQuote {
        RawQuote::new(book, GAME, player, "Receptions")
            .with_line(line)
            .with_odds("-110", "-120")
    }

    fn view(records: &[RawQuote], game_lines: &[RawGameLine]) -> MarketView {
        let normalizer = Normalizer::with_defaults();
        let store = QuoteStore::from_raw(records, &normalizer);
        let lines: Vec<GameLine> = game_lines
            .iter()
            .map(|raw| normalizer.normalize_game_line(raw))
            .collect();
        MarketView::build(&store, &lines)
    }

    #[test]
    fn test_market_view_nesting() {
        let market = view(
            &[
                quote("FanDuel", "Travis Kelce", "5.5").with_team("KC Chiefs"),
                quote("DraftKings", "Travis Kelce", "5.5"),
                quote("DraftKings", "Travis Kelce", "6.5"),
            ],
            &[],
        );

        assert_eq!(market.sportsbooks, vec![Sportsbook::DraftKings, Sportsbook::FanDuel]);
        let game = &market.games["Buffalo Bills @ Kansas City Chiefs"];
        let team = &game.teams["Kansas City Chiefs"];
        let player = &team.players["travis kelce"];
        assert_eq!(player.name, "Travis Kelce");

        let lines = &player.props["Receptions"][FULL_GAME];
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, Some(dec!(5.5)));
        assert!(lines[0].odds[&Sportsbook::FanDuel].is_quoted());
        assert_eq!(lines[0].odds[&Sportsbook::DraftKings].over_display.as_deref(), Some("-110"));
        // Every book appears, quoted or not
        assert!(!lines[1].odds[&Sportsbook::FanDuel].is_quoted());
    }

    #[test]
    fn test_lines_sorted_absent_last() {
        let market = view(
            &[
                quote("FanDuel", "Travis Kelce", "N/A").with_team("KC Chiefs"),
                quote("FanDuel", "Travis Kelce", "6.5").with_team("KC Chiefs"),
                quote("FanDuel", "Travis Kelce", "4.5").with_team("KC Chiefs"),
            ],
            &[],
        );

        let game = &market.games["Buffalo Bills @ Kansas City Chiefs"];
        let lines = &game.teams["Kansas City Chiefs"].players["travis kelce"].props["Receptions"]
            [FULL_GAME];
        let order: Vec<Option<Decimal>> = lines.iter().map(|l| l.line).collect();
        assert_eq!(order, vec![Some(dec!(4.5)), Some(dec!(6.5)), None]);
    }

    #[test]
    fn test_quotes_without_team_skipped() {
        let market = view(&[quote("DraftKings", "Travis Kelce", "5.5")], &[]);
        assert_eq!(market.game_count(), 0);
    }

    #[test]
    fn test_game_line_attached() {
        let game_line = RawGameLine {
            game: "BUF Bills @ KC Chiefs".to_string(),
            total_line: Some("47.5".to_string()),
            ..RawGameLine::default()
        };
        let second = RawGameLine {
            game: GAME.to_string(),
            total_line: Some("48.5".to_string()),
            ..RawGameLine::default()
        };

        let market = view(
            &[quote("FanDuel", "Travis Kelce", "5.5").with_team("KC Chiefs")],
            &[game_line, second],
        );
        let game = &market.games["Buffalo Bills @ Kansas City Chiefs"];
        let attached = game.game_line.as_ref().unwrap();
        assert_eq!(attached.total_line, Some(dec!(47.5)));
    }

    #[test]
    fn test_market_view_serializes() {
        let market = view(
            &[quote("FanDuel", "Travis Kelce", "5.5").with_team("KC Chiefs")],
            &[],
        );
        let json = serde_json::to_value(&market).unwrap();
        assert!(json["games"]["Buffalo Bills @ Kansas City Chiefs"]["teams"]["Kansas City Chiefs"]
            .is_object());
        assert_eq!(json["sportsbooks"][0], "FanDuel");
    }
}
