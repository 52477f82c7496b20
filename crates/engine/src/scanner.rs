//! One computation pass over a quote window.
//!
//! ```text
//! raw quotes -> Normalizer -> QuoteStore -> { arbitrage, value, movement }
//!                                        -> market view
//!                                        -> ScanReport
//! ```
//!
//! The detectors are independent read-only passes over one store. [`scan`]
//! runs them in sequence; callers that want them in parallel build the store
//! with [`build_store`], share it behind an `Arc` and hand the outputs back
//! to [`assemble`].
//!
//! [`scan`]: MarketScanner::scan
//! [`build_store`]: MarketScanner::build_store
//! [`assemble`]: MarketScanner::assemble

use propline_core::{AppConfig, DetectionConfig, RawGameLine, RawQuote};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::detector::{ArbitrageDetector, ArbitrageOpportunity};
use crate::error::EngineError;
use crate::market::MarketView;
use crate::matcher::QuoteMatcher;
use crate::movement::{LineMovement, LineMovementTracker};
use crate::normalizer::Normalizer;
use crate::store::QuoteStore;
use crate::types::Sportsbook;
use crate::value::{LineShoppingOpportunity, OddsShoppingOpportunity, ValueDetector, ValueReport};

/// Window name used when the caller does not name one.
const DEFAULT_WINDOW: &str = "input window";

// =============================================================================
// Scan Report
// =============================================================================

/// Counts from one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub quotes_loaded: usize,
    /// Quotes left after collapsing history to the latest observation.
    pub current_quotes: usize,
    pub line_groups: usize,
    pub cross_book_line_groups: usize,
    pub cross_book_identity_groups: usize,
    pub has_history: bool,
    pub arbitrage_found: usize,
    pub odds_shopping_found: usize,
    pub line_shopping_found: usize,
    pub movements_found: usize,
}

/// Everything one pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub week: Option<u32>,
    pub quotes_loaded: usize,
    pub sportsbooks: Vec<Sportsbook>,
    pub arbitrage: Vec<ArbitrageOpportunity>,
    pub odds_shopping: Vec<OddsShoppingOpportunity>,
    pub line_shopping: Vec<LineShoppingOpportunity>,
    pub movements: Vec<LineMovement>,
    pub market: MarketView,
    pub summary: ScanSummary,
}

/// Detector outputs handed to [`MarketScanner::assemble`].
#[derive(Debug, Clone, Default)]
pub struct DetectorOutput {
    pub arbitrage: Vec<ArbitrageOpportunity>,
    pub value: ValueReport,
    pub movements: Vec<LineMovement>,
}

// =============================================================================
// Market Scanner
// =============================================================================

/// Runs the normalizer, detectors and market view over one window.
#[derive(Debug)]
pub struct MarketScanner {
    config: DetectionConfig,
    normalizer: Normalizer,
    arbitrage: ArbitrageDetector,
    value: ValueDetector,
    movement: LineMovementTracker,
}

impl MarketScanner {
    /// Creates a scanner, rejecting settings that cannot rank anything.
    pub fn new(config: DetectionConfig, normalizer: Normalizer) -> Result<Self, EngineError> {
        validate(&config)?;
        Ok(Self {
            arbitrage: ArbitrageDetector::new(),
            value: ValueDetector::with_config(&config),
            movement: LineMovementTracker::with_config(&config),
            config,
            normalizer,
        })
    }

    /// Creates a scanner from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        Self::new(config.detection.clone(), Normalizer::from_config(config))
    }

    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    #[must_use]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    #[must_use]
    pub fn arbitrage(&self) -> &ArbitrageDetector {
        &self.arbitrage
    }

    #[must_use]
    pub fn value(&self) -> &ValueDetector {
        &self.value
    }

    #[must_use]
    pub fn movement(&self) -> &LineMovementTracker {
        &self.movement
    }

    /// Normalizes a window into a store.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoData`] when `raw_quotes` is empty.
    pub fn build_store(&self, raw_quotes: &[RawQuote], window: &str) -> Result<QuoteStore, EngineError> {
        if raw_quotes.is_empty() {
            warn!(window = %window, "No quotes in window");
            return Err(EngineError::no_data(window));
        }
        Ok(QuoteStore::from_raw(raw_quotes, &self.normalizer))
    }

    /// Runs every detector over `store`.
    #[must_use]
    pub fn detect(&self, store: &QuoteStore) -> DetectorOutput {
        DetectorOutput {
            arbitrage: self.arbitrage.detect(store),
            value: self.value.detect(store),
            movements: self.movement.track(store),
        }
    }

    /// Runs one full pass.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoData`] when `raw_quotes` is empty.
    pub fn scan(
        &self,
        raw_quotes: &[RawQuote],
        raw_game_lines: &[RawGameLine],
    ) -> Result<ScanReport, EngineError> {
        let store = self.build_store(raw_quotes, DEFAULT_WINDOW)?;
        let output = self.detect(&store);
        Ok(self.assemble(&store, raw_quotes, raw_game_lines, output))
    }

    /// Combines detector outputs with the market view into a report.
    #[must_use]
    pub fn assemble(
        &self,
        store: &QuoteStore,
        raw_quotes: &[RawQuote],
        raw_game_lines: &[RawGameLine],
        output: DetectorOutput,
    ) -> ScanReport {
        let game_lines: Vec<_> = raw_game_lines
            .iter()
            .map(|raw| self.normalizer.normalize_game_line(raw))
            .collect();
        let market = MarketView::build(store, &game_lines);

        let line_groups = QuoteMatcher::line_groups(store).len();
        let summary = ScanSummary {
            quotes_loaded: store.len(),
            current_quotes: store.latest_per_book_line_identity().len(),
            line_groups,
            cross_book_line_groups: QuoteMatcher::cross_book_line_groups(store).len(),
            cross_book_identity_groups: QuoteMatcher::cross_book_groups(store).len(),
            has_history: store.has_history(),
            arbitrage_found: output.arbitrage.len(),
            odds_shopping_found: output.value.odds_shopping.len(),
            line_shopping_found: output.value.line_shopping.len(),
            movements_found: output.movements.len(),
        };

        info!(
            quotes = summary.quotes_loaded,
            line_groups = summary.line_groups,
            cross_book = summary.cross_book_line_groups,
            arbitrage = summary.arbitrage_found,
            odds_shopping = summary.odds_shopping_found,
            line_shopping = summary.line_shopping_found,
            movements = summary.movements_found,
            "Scan complete"
        );

        ScanReport {
            week: week_of(raw_quotes),
            quotes_loaded: store.len(),
            sportsbooks: store.sportsbooks(),
            arbitrage: output.arbitrage,
            odds_shopping: output.value.odds_shopping,
            line_shopping: output.value.line_shopping,
            movements: output.movements,
            market,
            summary,
        }
    }
}

fn validate(config: &DetectionConfig) -> Result<(), EngineError> {
    if config.top_n == 0 {
        return Err(EngineError::invalid_config("top_n must be at least 1"));
    }
    if config.odds_diff_threshold <= 0 {
        return Err(EngineError::invalid_config(format!(
            "odds_diff_threshold must be positive, got {}",
            config.odds_diff_threshold
        )));
    }
    let thresholds = &config.line_thresholds;
    if thresholds.default < Decimal::ZERO {
        return Err(EngineError::invalid_config("default line threshold is negative"));
    }
    if let Some((prop, _)) = thresholds.by_prop.iter().find(|(_, t)| **t < Decimal::ZERO) {
        return Err(EngineError::invalid_config(format!(
            "line threshold for {prop} is negative"
        )));
    }
    Ok(())
}

/// First week number carried by the records.
fn week_of(raw_quotes: &[RawQuote]) -> Option<u32> {
    raw_quotes
        .iter()
        .filter_map(|r| r.week.as_deref())
        .find_map(|w| {
            let w = w.trim();
            // CSV exports write integer columns with missing values as floats.
            let w = w.strip_suffix(".0").unwrap_or(w);
            w.parse::<u32>().ok()
        })
}
