//! Cross-book arbitrage detection.
//!
//! Within one `(identity, line)` group, take the best over price and the best
//! under price across all books. If their implied probabilities sum to less
//! than one, backing both sides guarantees a profit:
//!
//! ```text
//! FanDuel     Over  +120  ->  p = 100 / 220 = 0.4545
//! DraftKings  Under +110  ->  p = 100 / 210 = 0.4762
//!                                     sum = 0.9307
//! margin = (1 - 0.9307) * 100 = 6.93%
//! ```

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::matcher::{MatchedGroup, QuoteMatcher, MIN_SPORTSBOOKS};
use crate::odds::{format_american_odds, implied_probability};
use crate::store::QuoteStore;
use crate::types::{LineKey, Quote, Side, Sportsbook};

/// Total stake the recommended split is expressed against.
const STAKE_UNITS: Decimal = dec!(100);

// =============================================================================
// Arbitrage Opportunity
// =============================================================================

/// One side of an arbitrage position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageLeg {
    pub side: Side,
    pub sportsbook: Sportsbook,
    pub odds: i32,
    /// Odds with an explicit "+" for positive prices.
    pub odds_display: String,
    pub implied_probability: Decimal,
    /// Share of a 100-unit total stake, rounded to 2 dp.
    pub stake: Decimal,
}

/// A risk-free position across two sportsbooks on one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageOpportunity {
    pub game: String,
    pub player: String,
    pub player_key: String,
    pub prop_main: String,
    pub prop_qualifier: String,
    /// Canonical "Main (Qualifier)" label.
    pub prop: String,
    pub line: Option<Decimal>,
    pub over: ArbitrageLeg,
    pub under: ArbitrageLeg,
    /// Sum of both legs' implied probabilities (< 1).
    pub total_implied_probability: Decimal,
    /// Guaranteed return in percent, rounded to 2 dp.
    pub margin: Decimal,
    /// Margin formatted as a percentage, e.g. "6.93%".
    pub margin_pct: String,
}

// =============================================================================
// Arbitrage Detector
// =============================================================================

/// Finds opposite-side mispricings within one betting line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArbitrageDetector;

impl ArbitrageDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scans every cross-book `(identity, line)` group of the current market.
    ///
    /// Output is sorted by margin, largest first.
    #[must_use]
    pub fn detect(&self, store: &QuoteStore) -> Vec<ArbitrageOpportunity> {
        let groups = QuoteMatcher::cross_book_line_groups(store);
        let mut opportunities: Vec<ArbitrageOpportunity> =
            groups.iter().filter_map(|g| self.detect_group(g)).collect();

        // Stable: equal margins keep group order.
        opportunities.sort_by(|a, b| b.margin.cmp(&a.margin));

        debug!(
            groups = groups.len(),
            opportunities = opportunities.len(),
            "Arbitrage scan complete"
        );
        opportunities
    }

    /// Checks one `(identity, line)` group.
    #[must_use]
    pub fn detect_group(&self, group: &MatchedGroup<'_, LineKey>) -> Option<ArbitrageOpportunity> {
        let priced: Vec<&Quote> = group
            .quotes
            .iter()
            .copied()
            .filter(|q| {
                q.over_odds.and_then(implied_probability).is_some()
                    && q.under_odds.and_then(implied_probability).is_some()
            })
            .collect();

        let books: BTreeSet<&Sportsbook> = priced.iter().map(|q| &q.sportsbook).collect();
        if books.len() < MIN_SPORTSBOOKS {
            trace!(
                player = %group.key.identity.player_key,
                prop = %group.key.identity.prop_label(),
                books = books.len(),
                "Too few books pricing both sides"
            );
            return None;
        }

        let best_over = best_price(&priced, Side::Over)?;
        let best_under = best_price(&priced, Side::Under)?;
        let p_over = best_over.1;
        let p_under = best_under.1;
        let total = p_over + p_under;

        if total >= Decimal::ONE {
            trace!(
                player = %group.key.identity.player_key,
                prop = %group.key.identity.prop_label(),
                total_implied = %total.round_dp(4),
                "No arbitrage - implied probabilities sum >= 1"
            );
            return None;
        }

        let margin = ((Decimal::ONE - total) * dec!(100)).round_dp(2);
        let first = priced[0];
        let opportunity = ArbitrageOpportunity {
            game: first.game_key.clone(),
            player: first.player_display.clone(),
            player_key: group.key.identity.player_key.clone(),
            prop_main: group.key.identity.prop_main.clone(),
            prop_qualifier: group.key.identity.prop_qualifier.clone(),
            prop: group.key.identity.prop_label(),
            line: group.key.line,
            over: leg(Side::Over, best_over, total),
            under: leg(Side::Under, best_under, total),
            total_implied_probability: total.round_dp(4),
            margin,
            margin_pct: format!("{margin:.2}%"),
        };

        info!(
            player = %opportunity.player,
            prop = %opportunity.prop,
            line = ?opportunity.line,
            over_book = %opportunity.over.sportsbook,
            over_odds = %opportunity.over.odds_display,
            under_book = %opportunity.under.sportsbook,
            under_odds = %opportunity.under.odds_display,
            margin_pct = %opportunity.margin_pct,
            "Arbitrage opportunity detected"
        );
        Some(opportunity)
    }
}

/// Best (highest) price for a side with its implied probability. Ties keep
/// the first quote.
fn best_price<'a>(quotes: &[&'a Quote], side: Side) -> Option<(&'a Quote, Decimal, i32)> {
    let mut best: Option<(&Quote, Decimal, i32)> = None;
    for &quote in quotes {
        let Some(odds) = quote.odds(side) else {
            continue;
        };
        let Some(probability) = implied_probability(odds) else {
            continue;
        };
        if best.map_or(true, |(_, _, current)| odds > current) {
            best = Some((quote, probability, odds));
        }
    }
    best
}

fn leg(side: Side, (quote, probability, odds): (&Quote, Decimal, i32), total: Decimal) -> ArbitrageLeg {
    ArbitrageLeg {
        side,
        sportsbook: quote.sportsbook.clone(),
        odds,
        odds_display: format_american_odds(odds),
        implied_probability: probability.round_dp(4),
        stake: (STAKE_UNITS * probability / total).round_dp(2),
    }
}
