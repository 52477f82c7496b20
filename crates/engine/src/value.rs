//! Value detection: odds shopping and line shopping.
//!
//! - **Odds shopping**: on the same line, one book pays noticeably more for
//!   the same side than another.
//! - **Line shopping** (middles): books hang different lines on the same
//!   prop. Over the low line and under the high line can both win.
//!
//! ```text
//! Passing Yards   BookA 249.5   BookB 259.5   diff 10.0 >= 10.0
//!   -> Over 249.5 at BookA, Under 259.5 at BookB
//! ```

use std::collections::BTreeMap;

use propline_core::{DetectionConfig, LineThresholds};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::matcher::{MatchedGroup, QuoteMatcher, MIN_SPORTSBOOKS};
use crate::odds::{format_american_odds, is_valid_american};
use crate::store::QuoteStore;
use crate::types::{IdentityKey, LineKey, Quote, Side, Sportsbook};

// =============================================================================
// Opportunities
// =============================================================================

/// Same line, same side, different price across books.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsShoppingOpportunity {
    pub game: String,
    pub player: String,
    pub player_key: String,
    pub prop_main: String,
    pub prop_qualifier: String,
    pub prop: String,
    pub line: Option<Decimal>,
    pub side: Side,
    pub best_book: Sportsbook,
    pub best_odds: i32,
    pub best_odds_display: String,
    pub worst_book: Sportsbook,
    pub worst_odds: i32,
    pub worst_odds_display: String,
    /// Raw American-odds point difference (best - worst).
    pub odds_diff: i32,
    /// Books pricing this side.
    pub books_compared: usize,
}

/// A middle: over the low line at one book, under the high line at another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShoppingOpportunity {
    pub game: String,
    pub player: String,
    pub player_key: String,
    pub prop_main: String,
    pub prop_qualifier: String,
    pub prop: String,
    /// Book with the low line; take the over here.
    pub over_book: Sportsbook,
    pub over_line: Decimal,
    pub over_odds: Option<i32>,
    pub over_odds_display: Option<String>,
    /// Book with the high line; take the under here.
    pub under_book: Sportsbook,
    pub under_line: Decimal,
    pub under_odds: Option<i32>,
    pub under_odds_display: Option<String>,
    pub line_diff: Decimal,
    /// Category threshold the gap was tested against.
    pub threshold: Decimal,
}

/// Both value lists from one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueReport {
    pub odds_shopping: Vec<OddsShoppingOpportunity>,
    pub line_shopping: Vec<LineShoppingOpportunity>,
}

// =============================================================================
// Value Detector
// =============================================================================

/// Finds odds and line discrepancies across books.
#[derive(Debug, Clone)]
pub struct ValueDetector {
    odds_diff_threshold: i32,
    top_n: usize,
    thresholds: LineThresholds,
}

impl Default for ValueDetector {
    fn default() -> Self {
        Self::with_config(&DetectionConfig::default())
    }
}

impl ValueDetector {
    /// Creates a detector with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector from detection settings.
    #[must_use]
    pub fn with_config(config: &DetectionConfig) -> Self {
        Self {
            odds_diff_threshold: config.odds_diff_threshold,
            top_n: config.top_n,
            thresholds: config.line_thresholds.clone(),
        }
    }

    /// Runs both sub-detectors.
    #[must_use]
    pub fn detect(&self, store: &QuoteStore) -> ValueReport {
        ValueReport {
            odds_shopping: self.odds_shopping(store),
            line_shopping: self.line_shopping(store),
        }
    }

    /// Same-line price discrepancies, top-N by odds difference.
    #[must_use]
    pub fn odds_shopping(&self, store: &QuoteStore) -> Vec<OddsShoppingOpportunity> {
        let groups = QuoteMatcher::cross_book_line_groups(store);
        let mut found: Vec<OddsShoppingOpportunity> = groups
            .iter()
            .flat_map(|group| {
                [Side::Over, Side::Under]
                    .into_iter()
                    .filter_map(move |side| self.shop_odds(group, side))
            })
            .collect();

        found.sort_by(|a, b| b.odds_diff.cmp(&a.odds_diff));
        let total = found.len();
        found.truncate(self.top_n);

        debug!(
            groups = groups.len(),
            found = total,
            kept = found.len(),
            "Odds shopping scan complete"
        );
        found
    }

    /// Cross-line middles, top-N by line difference.
    #[must_use]
    pub fn line_shopping(&self, store: &QuoteStore) -> Vec<LineShoppingOpportunity> {
        let groups = QuoteMatcher::cross_book_groups(store);
        let mut found: Vec<LineShoppingOpportunity> =
            groups.iter().filter_map(|g| self.shop_lines(g)).collect();

        found.sort_by(|a, b| b.line_diff.cmp(&a.line_diff));
        let total = found.len();
        found.truncate(self.top_n);

        debug!(
            groups = groups.len(),
            found = total,
            kept = found.len(),
            "Line shopping scan complete"
        );
        found
    }

    fn shop_odds(
        &self,
        group: &MatchedGroup<'_, LineKey>,
        side: Side,
    ) -> Option<OddsShoppingOpportunity> {
        // Each book's best price for the side, in first-seen order.
        let mut per_book: Vec<(&Quote, i32)> = Vec::new();
        for &quote in &group.quotes {
            let Some(odds) = quote.odds(side).filter(|o| is_valid_american(*o)) else {
                continue;
            };
            match per_book.iter_mut().find(|(q, _)| q.sportsbook == quote.sportsbook) {
                Some(entry) if odds > entry.1 => *entry = (quote, odds),
                Some(_) => {}
                None => per_book.push((quote, odds)),
            }
        }

        if per_book.len() < MIN_SPORTSBOOKS {
            return None;
        }

        let (best_quote, best) = first_by(&per_book, |odds, current| odds > current)?;
        let (worst_quote, worst) = first_by(&per_book, |odds, current| odds < current)?;
        let Some(diff) = best.checked_sub(worst) else {
            debug!(
                player = %group.key.identity.player_key,
                prop = %group.key.identity.prop_label(),
                side = %side,
                best_odds = best,
                worst_odds = worst,
                "Odds spread overflowed, group skipped"
            );
            return None;
        };

        if diff < self.odds_diff_threshold {
            trace!(
                player = %group.key.identity.player_key,
                prop = %group.key.identity.prop_label(),
                side = %side,
                odds_diff = diff,
                "Odds spread below threshold"
            );
            return None;
        }

        let identity = &group.key.identity;
        let opportunity = OddsShoppingOpportunity {
            game: best_quote.game_key.clone(),
            player: best_quote.player_display.clone(),
            player_key: identity.player_key.clone(),
            prop_main: identity.prop_main.clone(),
            prop_qualifier: identity.prop_qualifier.clone(),
            prop: identity.prop_label(),
            line: group.key.line,
            side,
            best_book: best_quote.sportsbook.clone(),
            best_odds: best,
            best_odds_display: format_american_odds(best),
            worst_book: worst_quote.sportsbook.clone(),
            worst_odds: worst,
            worst_odds_display: format_american_odds(worst),
            odds_diff: diff,
            books_compared: per_book.len(),
        };

        info!(
            player = %opportunity.player,
            prop = %opportunity.prop,
            side = %side,
            best_book = %opportunity.best_book,
            best_odds = %opportunity.best_odds_display,
            worst_book = %opportunity.worst_book,
            worst_odds = %opportunity.worst_odds_display,
            odds_diff = diff,
            "Odds shopping opportunity detected"
        );
        Some(opportunity)
    }

    fn shop_lines(&self, group: &MatchedGroup<'_, IdentityKey>) -> Option<LineShoppingOpportunity> {
        // Lowest and highest line each book hangs, first quote on ties.
        let mut ranges: BTreeMap<&Sportsbook, (&Quote, &Quote)> = BTreeMap::new();
        let mut order: Vec<&Sportsbook> = Vec::new();
        for &quote in &group.quotes {
            let Some(line) = quote.line else {
                continue;
            };
            match ranges.get_mut(&quote.sportsbook) {
                Some((low, high)) => {
                    if low.line.is_some_and(|l| line < l) {
                        *low = quote;
                    }
                    if high.line.is_some_and(|h| line > h) {
                        *high = quote;
                    }
                }
                None => {
                    ranges.insert(&quote.sportsbook, (quote, quote));
                    order.push(&quote.sportsbook);
                }
            }
        }

        if ranges.len() < MIN_SPORTSBOOKS {
            return None;
        }

        // Pair the overall low with the best high elsewhere, and the overall
        // high with the best low elsewhere; keep the wider.
        let lows: Vec<&Quote> = order.iter().map(|b| ranges[b].0).collect();
        let highs: Vec<&Quote> = order.iter().map(|b| ranges[b].1).collect();
        let low = extreme(&lows, |a, b| a < b)?;
        let high = extreme(&highs, |a, b| a > b)?;
        let high_elsewhere = extreme_excluding(&highs, &low.sportsbook, |a, b| a > b);
        let low_elsewhere = extreme_excluding(&lows, &high.sportsbook, |a, b| a < b);

        let candidates = [
            high_elsewhere.map(|h| (low, h)),
            low_elsewhere.map(|l| (l, high)),
        ];
        let (over_quote, under_quote, diff) = candidates
            .into_iter()
            .flatten()
            .filter_map(|(l, h)| {
                let diff = h.line?.checked_sub(l.line?);
                if diff.is_none() {
                    debug!(
                        player = %group.key.player_key,
                        prop = %group.key.prop_label(),
                        "Line gap overflowed, pair skipped"
                    );
                }
                Some((l, h, diff?))
            })
            .fold(None::<(&Quote, &Quote, Decimal)>, |best, candidate| match best {
                Some(current) if current.2 >= candidate.2 => Some(current),
                _ => Some(candidate),
            })?;

        let threshold = self.thresholds.threshold(&group.key.prop_main);
        if diff <= Decimal::ZERO || diff < threshold {
            trace!(
                player = %group.key.player_key,
                prop = %group.key.prop_label(),
                line_diff = %diff,
                threshold = %threshold,
                "Line gap below threshold"
            );
            return None;
        }

        let over_line = over_quote.line?;
        let under_line = under_quote.line?;
        let opportunity = LineShoppingOpportunity {
            game: over_quote.game_key.clone(),
            player: over_quote.player_display.clone(),
            player_key: group.key.player_key.clone(),
            prop_main: group.key.prop_main.clone(),
            prop_qualifier: group.key.prop_qualifier.clone(),
            prop: group.key.prop_label(),
            over_book: over_quote.sportsbook.clone(),
            over_line,
            over_odds: over_quote.over_odds,
            over_odds_display: over_quote.over_odds.map(format_american_odds),
            under_book: under_quote.sportsbook.clone(),
            under_line,
            under_odds: under_quote.under_odds,
            under_odds_display: under_quote.under_odds.map(format_american_odds),
            line_diff: diff,
            threshold,
        };

        info!(
            player = %opportunity.player,
            prop = %opportunity.prop,
            over_book = %opportunity.over_book,
            over_line = %over_line,
            under_book = %opportunity.under_book,
            under_line = %under_line,
            line_diff = %diff,
            "Line shopping opportunity detected"
        );
        Some(opportunity)
    }
}

/// First entry that no later entry beats under `better`.
fn first_by<'a>(
    entries: &[(&'a Quote, i32)],
    better: impl Fn(i32, i32) -> bool,
) -> Option<(&'a Quote, i32)> {
    let mut chosen: Option<(&Quote, i32)> = None;
    for &(quote, odds) in entries {
        if chosen.map_or(true, |(_, current)| better(odds, current)) {
            chosen = Some((quote, odds));
        }
    }
    chosen
}

fn extreme<'a>(quotes: &[&'a Quote], better: impl Fn(Decimal, Decimal) -> bool) -> Option<&'a Quote> {
    let mut chosen: Option<&Quote> = None;
    for &quote in quotes {
        let Some(line) = quote.line else {
            continue;
        };
        if chosen.and_then(|c| c.line).map_or(true, |current| better(line, current)) {
            chosen = Some(quote);
        }
    }
    chosen
}

fn extreme_excluding<'a>(
    quotes: &[&'a Quote],
    excluded: &Sportsbook,
    better: impl Fn(Decimal, Decimal) -> bool,
) -> Option<&'a Quote> {
    let others: Vec<&Quote> = quotes
        .iter()
        .copied()
        .filter(|q| &q.sportsbook != excluded)
        .collect();
    extreme(&others, better)
}
