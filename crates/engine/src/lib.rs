//! Cross-sportsbook player prop reconciliation.
//!
//! This crate lines up player-prop quotes scraped from several sportsbooks
//! and finds three kinds of signal in them: arbitrage, value and line
//! movement.
//!
//! # Overview
//!
//! Books name the same proposition differently:
//!
//! ```text
//! FanDuel:     "John Smith Jr."              "1st Half Pass Yds"    134.5
//! DraftKings:  "John Smith Jr. Pass Yds O/U" "Passing Props"        134.5
//!
//! Both normalize to:
//!   player_key = "john smith"
//!   prop       = ("Passing Yards", "1st Half")
//! ```
//!
//! Once keys agree, quotes can be compared across books.
//!
//! # Modules
//!
//! - [`normalizer`]: Player, game and prop canonicalization
//! - [`odds`]: American odds parsing and implied probability
//! - [`store`]: In-memory quote store and grouping queries
//! - [`matcher`]: Cross-book equivalence groups
//! - [`detector`]: Arbitrage detection
//! - [`value`]: Odds shopping and line shopping
//! - [`movement`]: Line movement over time
//! - [`market`]: Nested market view for display
//! - [`scanner`]: One full pass over a window
//!
//! # Example
//!
//! ```ignore
//! use propline_core::AppConfig;
//! use propline_engine::MarketScanner;
//!
//! let scanner = MarketScanner::from_config(&AppConfig::default())?;
//! let report = scanner.scan(&raw_quotes, &raw_game_lines)?;
//!
//! for opp in &report.arbitrage {
//!     println!(
//!         "{} {}: Over {} @ {}, Under {} @ {} ({})",
//!         opp.player,
//!         opp.prop,
//!         opp.over.odds_display,
//!         opp.over.sportsbook,
//!         opp.under.odds_display,
//!         opp.under.sportsbook,
//!         opp.margin_pct,
//!     );
//! }
//! ```

pub mod detector;
pub mod error;
pub mod market;
pub mod matcher;
pub mod movement;
pub mod normalizer;
pub mod odds;
pub mod scanner;
pub mod store;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use detector::{ArbitrageDetector, ArbitrageLeg, ArbitrageOpportunity};
pub use error::EngineError;
pub use market::{BookOdds, GameEntry, LineEntry, MarketView, PlayerEntry, TeamEntry};
pub use matcher::{MatchedGroup, QuoteMatcher};
pub use movement::{LineMovement, LineMovementTracker};
pub use normalizer::{
    parse_line, parse_timestamp, NameResolution, NameResolver, Normalizer, PassthroughResolver,
    PrefixNameResolver, PropKey,
};
pub use odds::{format_american_odds, implied_probability, parse_american_odds};
pub use scanner::{DetectorOutput, MarketScanner, ScanReport, ScanSummary};
pub use store::QuoteStore;
pub use types::{GameLine, IdentityKey, LineKey, Quote, Side, Sportsbook, FULL_GAME, UNKNOWN_PROP};
pub use value::{LineShoppingOpportunity, OddsShoppingOpportunity, ValueDetector, ValueReport};
