//! Line movement across scrape snapshots.
//!
//! Each `(identity, sportsbook)` history is ordered by scrape time and its
//! first and last lines compared:
//!
//! ```text
//! Receptions @ FanDuel   09:00  5.5   ->   18:00  6.5   change +1.0
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use propline_core::{DetectionConfig, LineThresholds};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::store::QuoteStore;
use crate::types::{IdentityKey, Quote, Sportsbook};

/// A significant change in one book's line over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineMovement {
    pub game: String,
    pub player: String,
    pub player_key: String,
    pub prop_main: String,
    pub prop_qualifier: String,
    pub prop: String,
    pub sportsbook: Sportsbook,
    pub start_line: Decimal,
    pub end_line: Decimal,
    /// Signed change, `end_line - start_line`.
    pub change: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Timestamped observations in the history.
    pub observations: usize,
}

impl LineMovement {
    /// Size of the move regardless of direction.
    #[must_use]
    pub fn abs_change(&self) -> Decimal {
        self.change.abs()
    }

    /// True when the line went up.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.change > Decimal::ZERO
    }
}

/// Finds the largest line moves in a timestamped history.
#[derive(Debug, Clone)]
pub struct LineMovementTracker {
    top_n: usize,
    thresholds: LineThresholds,
}

impl Default for LineMovementTracker {
    fn default() -> Self {
        Self::with_config(&DetectionConfig::default())
    }
}

impl LineMovementTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &DetectionConfig) -> Self {
        Self {
            top_n: config.top_n,
            thresholds: config.line_thresholds.clone(),
        }
    }

    /// Scans the full (uncollapsed) history.
    ///
    /// Quotes without a timestamp or a line are ignored. A store with no
    /// timestamps yields an empty list.
    #[must_use]
    pub fn track(&self, store: &QuoteStore) -> Vec<LineMovement> {
        if !store.has_history() {
            debug!("No timestamped quotes, skipping line movement");
            return Vec::new();
        }

        let mut histories: BTreeMap<(IdentityKey, &Sportsbook), Vec<&Quote>> = BTreeMap::new();
        for quote in store.quotes() {
            if quote.observed_at.is_some() && quote.line.is_some() {
                histories
                    .entry((quote.identity(), &quote.sportsbook))
                    .or_default()
                    .push(quote);
            }
        }

        let mut movements: Vec<LineMovement> = histories
            .into_iter()
            .filter_map(|((identity, book), mut history)| {
                if history.len() < 2 {
                    return None;
                }
                // Stable: equal timestamps keep input order.
                history.sort_by_key(|q| q.observed_at);
                self.compare(&identity, book, &history)
            })
            .collect();

        movements.sort_by(|a, b| b.abs_change().cmp(&a.abs_change()));
        let total = movements.len();
        movements.truncate(self.top_n);

        debug!(
            found = total,
            kept = movements.len(),
            "Line movement scan complete"
        );
        movements
    }

    fn compare(
        &self,
        identity: &IdentityKey,
        book: &Sportsbook,
        history: &[&Quote],
    ) -> Option<LineMovement> {
        let first = history.first()?;
        let last = history.last()?;
        let (start_line, end_line) = (first.line?, last.line?);
        let Some(change) = end_line.checked_sub(start_line) else {
            debug!(
                player = %identity.player_key,
                prop = %identity.prop_label(),
                sportsbook = %book,
                "Line change overflowed, history skipped"
            );
            return None;
        };
        let threshold = self.thresholds.threshold(&identity.prop_main);

        if change.abs() < threshold || change.is_zero() {
            trace!(
                player = %identity.player_key,
                prop = %identity.prop_label(),
                sportsbook = %book,
                change = %change,
                threshold = %threshold,
                "Line move below threshold"
            );
            return None;
        }

        let movement = LineMovement {
            game: last.game_key.clone(),
            player: last.player_display.clone(),
            player_key: identity.player_key.clone(),
            prop_main: identity.prop_main.clone(),
            prop_qualifier: identity.prop_qualifier.clone(),
            prop: identity.prop_label(),
            sportsbook: book.clone(),
            start_line,
            end_line,
            change,
            start_time: first.observed_at?,
            end_time: last.observed_at?,
            observations: history.len(),
        };

        info!(
            player = %movement.player,
            prop = %movement.prop,
            sportsbook = %book,
            start_line = %start_line,
            end_line = %end_line,
            change = %change,
            "Significant line movement detected"
        );
        Some(movement)
    }
}
