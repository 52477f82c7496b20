//! Cross-book matching over the current market.
//!
//! A group is only interesting when at least two sportsbooks quote it;
//! single-book groups are skipped, never reported as errors.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::store::{group_by, QuoteStore};
use crate::types::{IdentityKey, LineKey, Quote, Sportsbook};

/// Minimum distinct sportsbooks for a group to be comparable.
pub const MIN_SPORTSBOOKS: usize = 2;

/// Quotes sharing one equivalence key across sportsbooks.
#[derive(Debug, Clone)]
pub struct MatchedGroup<'a, K> {
    pub key: K,
    /// Current-market quotes, in input order.
    pub quotes: Vec<&'a Quote>,
    /// Distinct sportsbooks in the group, sorted.
    pub sportsbooks: Vec<Sportsbook>,
}

impl<K> MatchedGroup<'_, K> {
    /// Number of distinct sportsbooks.
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.sportsbooks.len()
    }
}

/// Groups the current market by equivalence key.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteMatcher;

impl QuoteMatcher {
    /// Identity groups (any line) quoted by at least two sportsbooks.
    #[must_use]
    pub fn cross_book_groups(store: &QuoteStore) -> Vec<MatchedGroup<'_, IdentityKey>> {
        cross_book(group_by(
            store.latest_per_book_line_identity(),
            Quote::identity,
        ))
    }

    /// `(identity, line)` groups quoted by at least two sportsbooks.
    #[must_use]
    pub fn cross_book_line_groups(store: &QuoteStore) -> Vec<MatchedGroup<'_, LineKey>> {
        cross_book(Self::line_groups(store))
    }

    /// Every `(identity, line)` group of the current market, cross-book or
    /// not.
    #[must_use]
    pub fn line_groups(store: &QuoteStore) -> BTreeMap<LineKey, Vec<&Quote>> {
        group_by(store.latest_per_book_line_identity(), Quote::line_key)
    }
}

fn cross_book<'a, K: std::fmt::Debug>(
    groups: BTreeMap<K, Vec<&'a Quote>>,
) -> Vec<MatchedGroup<'a, K>> {
    groups
        .into_iter()
        .filter_map(|(key, quotes)| {
            let sportsbooks: Vec<Sportsbook> = quotes
                .iter()
                .map(|q| q.sportsbook.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if sportsbooks.len() < MIN_SPORTSBOOKS {
                trace!(key = ?key, "Single-book group skipped");
                return None;
            }
            Some(MatchedGroup {
                key,
                quotes,
                sportsbooks,
            })
        })
        .collect()
}
