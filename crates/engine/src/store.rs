//! In-memory quote store for one scan window.
//!
//! The store owns the normalized quotes and answers grouping queries over
//! them. It is built once and never mutated, so detectors can borrow it from
//! several threads at once.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use propline_core::RawQuote;
use tracing::debug;

use crate::normalizer::Normalizer;
use crate::types::{IdentityKey, LineKey, Quote, Sportsbook};

/// Normalized quotes for one window.
#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Creates a store over already-normalized quotes.
    #[must_use]
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Normalizes raw records into a store.
    ///
    /// Clean names are harvested from the trusted sportsbook before
    /// normalizing, and quotes missing a team borrow it from the trusted
    /// book's quote for the same player.
    #[must_use]
    pub fn from_raw(records: &[RawQuote], normalizer: &Normalizer) -> Self {
        let mut quotes = normalizer.normalize_all(records);
        let enriched = enrich_teams(&mut quotes, normalizer.trusted_sportsbook());

        debug!(
            records = records.len(),
            enriched_teams = enriched,
            "Built quote store"
        );
        Self::new(quotes)
    }

    /// Returns all quotes in input order.
    #[must_use]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Returns true if any quote carries a scrape timestamp.
    #[must_use]
    pub fn has_history(&self) -> bool {
        self.quotes.iter().any(|q| q.observed_at.is_some())
    }

    /// Returns the distinct sportsbooks, sorted.
    #[must_use]
    pub fn sportsbooks(&self) -> Vec<Sportsbook> {
        self.quotes
            .iter()
            .map(|q| q.sportsbook.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Buckets every quote by `(player_key, prop_main, prop_qualifier)`.
    #[must_use]
    pub fn group_by_identity(&self) -> BTreeMap<IdentityKey, Vec<&Quote>> {
        group_by(self.quotes.iter(), Quote::identity)
    }

    /// Buckets every quote by identity and line. An absent line is its own
    /// bucket.
    #[must_use]
    pub fn group_by_identity_and_line(&self) -> BTreeMap<LineKey, Vec<&Quote>> {
        group_by(self.quotes.iter(), Quote::line_key)
    }

    /// Returns the current market: one quote per
    /// `(identity, line, sportsbook, game_key)`.
    ///
    /// The most recent `observed_at` wins. Ties and untimestamped quotes
    /// resolve by input order, last wins. Output keeps the order in which
    /// each key was first seen.
    #[must_use]
    pub fn latest_per_book_line_identity(&self) -> Vec<&Quote> {
        let mut slots: HashMap<(LineKey, &Sportsbook, &str), usize> = HashMap::new();
        let mut latest: Vec<&Quote> = Vec::new();

        for quote in &self.quotes {
            let key = (quote.line_key(), &quote.sportsbook, quote.game_key.as_str());
            match slots.get(&key) {
                Some(&slot) => {
                    // None sorts before Some, so timestamped quotes replace
                    // untimestamped ones.
                    if quote.observed_at >= latest[slot].observed_at {
                        latest[slot] = quote;
                    }
                }
                None => {
                    slots.insert(key, latest.len());
                    latest.push(quote);
                }
            }
        }
        latest
    }
}

/// Groups quotes by a derived key, preserving input order within buckets.
pub(crate) fn group_by<'a, K, I, F>(quotes: I, key: F) -> BTreeMap<K, Vec<&'a Quote>>
where
    K: Ord,
    I: IntoIterator<Item = &'a Quote>,
    F: Fn(&Quote) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a Quote>> = BTreeMap::new();
    for quote in quotes {
        groups.entry(key(quote)).or_default().push(quote);
    }
    groups
}

/// Fills missing teams from the trusted book. Returns how many quotes were
/// enriched.
fn enrich_teams(quotes: &mut [Quote], trusted: &Sportsbook) -> usize {
    let mut teams: HashMap<String, (String, Option<String>)> = HashMap::new();
    for quote in quotes.iter().filter(|q| &q.sportsbook == trusted) {
        if let Some(team) = &quote.team_name {
            teams
                .entry(quote.player_key.clone())
                .or_insert_with(|| (team.clone(), quote.team_logo.clone()));
        }
    }

    let mut enriched = 0;
    for quote in quotes.iter_mut().filter(|q| q.team_name.is_none()) {
        if let Some((team, logo)) = teams.get(&quote.player_key) {
            quote.team_name = Some(team.clone());
            if quote.team_logo.is_none() {
                quote.team_logo.clone_from(logo);
            }
            enriched += 1;
        }
    }
    enriched
}
