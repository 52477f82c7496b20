//! Integration tests for full scan passes.
//!
//! These tests verify end-to-end reconciliation scenarios including:
//! - Corrupted DraftKings player fields matched against FanDuel names
//! - Arbitrage, odds shopping and line shopping on realistic slates
//! - Line movement across scrape snapshots
//! - Concurrent detector passes over one shared store

use std::sync::Arc;

use propline_core::{AppConfig, RawGameLine, RawQuote};
use propline_engine::{
    EngineError, MarketScanner, Normalizer, QuoteStore, Side, Sportsbook, FULL_GAME,
};
use rust_decimal_macros::dec;

// =============================================================================
// Helper Functions
// =============================================================================

const GAME: &str = "KC Chiefs @ BUF Bills";

fn scanner() -> MarketScanner {
    MarketScanner::from_config(&AppConfig::default()).expect("default config is valid")
}

/// FanDuel writes clean names with the prop in `prop_type`.
fn fanduel(player: &str, prop: &str, line: &str, over: &str, under: &str) -> RawQuote {
    RawQuote::new("FanDuel", GAME, player, prop)
        .with_line(line)
        .with_odds(over, under)
        .with_team("KC Chiefs")
}

/// DraftKings appends the prop to the player field under a category tab.
fn draftkings(player_and_prop: &str, tab: &str, line: &str, over: &str, under: &str) -> RawQuote {
    RawQuote::new("DraftKings", "BUF Bills @ KC Chiefs", player_and_prop, tab)
        .with_line(line)
        .with_odds(over, under)
}

// =============================================================================
// Reconciliation Scenarios
// =============================================================================

#[test]
fn test_corrupted_names_reconcile_across_books() {
    let records = vec![
        fanduel("Patrick Mahomes", "Passing Yds", "274.5", "-115", "-105"),
        draftkings("Patrick Mahomes Pass Yds O/U", "Passing Props", "274.5", "-110", "-110"),
    ];

    let store = QuoteStore::from_raw(&records, &Normalizer::with_defaults());
    let quotes = store.quotes();
    assert_eq!(quotes[0].identity(), quotes[1].identity());
    assert_eq!(quotes[0].game_key, quotes[1].game_key);
    assert_eq!(quotes[1].player_display, "Patrick Mahomes");
    assert_eq!(quotes[1].prop_qualifier, FULL_GAME);
    // Team enriched from FanDuel
    assert_eq!(quotes[1].team_name.as_deref(), Some("Kansas City Chiefs"));
}

#[test]
fn test_arbitrage_example() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "+120", "-150"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-160", "+110"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();
    assert_eq!(report.arbitrage.len(), 1);

    let opp = &report.arbitrage[0];
    assert_eq!(opp.player, "Travis Kelce");
    assert_eq!(opp.over.sportsbook, Sportsbook::FanDuel);
    assert_eq!(opp.over.odds_display, "+120");
    assert_eq!(opp.under.sportsbook, Sportsbook::DraftKings);
    assert_eq!(opp.under.odds_display, "+110");
    assert_eq!(opp.total_implied_probability, dec!(0.9307));
    assert_eq!(opp.margin_pct, "6.93%");
}

#[test]
fn test_standard_vig_never_arbitrage() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "-110", "-110"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-110", "-110"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();
    assert!(report.arbitrage.is_empty());
    assert!(report.odds_shopping.is_empty());
}

#[test]
fn test_odds_and_line_shopping_example() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "-110", "-110"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-150", "+110"),
        fanduel("Patrick Mahomes", "Passing Yds", "249.5", "-115", "-105"),
        draftkings("Patrick Mahomes Yds", "Passing Props", "259.5", "-110", "-120"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();

    let over = report
        .odds_shopping
        .iter()
        .find(|o| o.side == Side::Over)
        .expect("over side spread");
    assert_eq!(over.best_book, Sportsbook::FanDuel);
    assert_eq!(over.worst_book, Sportsbook::DraftKings);
    assert_eq!(over.odds_diff, 40);

    assert_eq!(report.line_shopping.len(), 1);
    let middle = &report.line_shopping[0];
    assert_eq!(middle.prop, "Passing Yards");
    assert_eq!(middle.over_book, Sportsbook::FanDuel);
    assert_eq!(middle.over_line, dec!(249.5));
    assert_eq!(middle.under_book, Sportsbook::DraftKings);
    assert_eq!(middle.under_line, dec!(259.5));
    assert_eq!(middle.line_diff, dec!(10.0));
}

#[test]
fn test_line_movement_example() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "-110", "-110")
            .with_timestamp("2025-10-12T09:00:00"),
        fanduel("Travis Kelce", "Receptions", "6.5", "-110", "-110")
            .with_timestamp("2025-10-12T18:00:00"),
        fanduel("Patrick Mahomes", "Passing TDs", "1.5", "-110", "-110")
            .with_timestamp("2025-10-12T09:00:00"),
        fanduel("Patrick Mahomes", "Passing TDs", "2.5", "-110", "-110")
            .with_timestamp("2025-10-12T18:00:00"),
        fanduel("Isiah Pacheco", "Rush Yds", "55.5", "-110", "-110")
            .with_timestamp("2025-10-12T09:00:00"),
        fanduel("Isiah Pacheco", "Rush Yds", "56.0", "-110", "-110")
            .with_timestamp("2025-10-12T18:00:00"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();
    assert!(report.summary.has_history);
    assert_eq!(report.movements.len(), 2);

    let kelce = report
        .movements
        .iter()
        .find(|m| m.player == "Travis Kelce")
        .expect("receptions move");
    assert_eq!(kelce.change, dec!(1.0));
    assert_eq!(kelce.start_line, dec!(5.5));
    assert_eq!(kelce.end_line, dec!(6.5));
}

#[test]
fn test_history_collapses_to_latest_for_detectors() {
    // The stale 09:00 FanDuel price would be an arbitrage; the 18:00 one is not.
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "+120", "-150")
            .with_timestamp("2025-10-12T09:00:00"),
        fanduel("Travis Kelce", "Receptions", "5.5", "-110", "-110")
            .with_timestamp("2025-10-12T18:00:00"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-160", "+110")
            .with_timestamp("2025-10-12T18:00:00"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();
    assert!(report.arbitrage.is_empty());
    assert_eq!(report.summary.quotes_loaded, 3);
    assert_eq!(report.summary.current_quotes, 2);
}

#[test]
fn test_single_book_slate_emits_nothing() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "+120", "+110"),
        fanduel("Travis Kelce", "Receptions", "7.5", "-300", "+250"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();
    assert!(report.arbitrage.is_empty());
    assert!(report.odds_shopping.is_empty());
    assert!(report.line_shopping.is_empty());
    assert_eq!(report.summary.cross_book_line_groups, 0);
}

#[test]
fn test_empty_window_is_no_data() {
    let err = scanner().scan(&[], &[]).unwrap_err();
    assert!(matches!(err, EngineError::NoData { .. }));
}

#[test]
fn test_market_view_with_game_line() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "-110", "-110"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-115", "-105"),
    ];
    let game_lines = vec![RawGameLine {
        game: GAME.to_string(),
        sportsbook: Some("FanDuel".to_string()),
        away_moneyline: Some("+120".to_string()),
        home_moneyline: Some("-140".to_string()),
        ..RawGameLine::default()
    }];

    let report = scanner().scan(&records, &game_lines).unwrap();
    let game = &report.market.games["Buffalo Bills @ Kansas City Chiefs"];
    assert_eq!(
        game.game_line.as_ref().and_then(|g| g.away_moneyline),
        Some(120)
    );

    let lines = &game.teams["Kansas City Chiefs"].players["travis kelce"].props["Receptions"]
        [FULL_GAME];
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].odds.len(), 2);
}

#[test]
fn test_report_serializes_flat_records() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "+120", "-150"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-160", "+110"),
    ];

    let report = scanner().scan(&records, &[]).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["arbitrage"][0]["over"]["sportsbook"], "FanDuel");
    assert_eq!(json["arbitrage"][0]["margin_pct"], "6.93%");
    assert_eq!(json["arbitrage"][0]["prop"], "Receptions");
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_detectors_run_concurrently_on_shared_store() {
    let records = vec![
        fanduel("Travis Kelce", "Receptions", "5.5", "+120", "-150"),
        draftkings("Travis Kelce Receptions", "Receiving Props", "5.5", "-160", "+110"),
        fanduel("Patrick Mahomes", "Passing Yds", "249.5", "-115", "-105"),
        draftkings("Patrick Mahomes Yds", "Passing Props", "259.5", "-110", "-120"),
    ];

    let scanner = Arc::new(scanner());
    let store = Arc::new(scanner.build_store(&records, "week 7").unwrap());

    let arbitrage = {
        let (scanner, store) = (Arc::clone(&scanner), Arc::clone(&store));
        tokio::task::spawn_blocking(move || scanner.arbitrage().detect(&store))
    };
    let value = {
        let (scanner, store) = (Arc::clone(&scanner), Arc::clone(&store));
        tokio::task::spawn_blocking(move || scanner.value().detect(&store))
    };
    let movements = {
        let (scanner, store) = (Arc::clone(&scanner), Arc::clone(&store));
        tokio::task::spawn_blocking(move || scanner.movement().track(&store))
    };

    let output = propline_engine::DetectorOutput {
        arbitrage: arbitrage.await.unwrap(),
        value: value.await.unwrap(),
        movements: movements.await.unwrap(),
    };
    let concurrent = scanner.assemble(&store, &records, &[], output);
    let sequential = scanner.scan(&records, &[]).unwrap();

    assert_eq!(concurrent, sequential);
}
