use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use anyhow::{Context, Result};
use propline_core::{RawGameLine, RawQuote};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Reads scraper CSV exports into raw records.
///
/// Both props shapes are accepted: the legacy single-snapshot file (no
/// `scrape_timestamp` column) and the history file (with it). Columns the
/// records do not know about are ignored.
pub struct QuoteCsvReader;

impl QuoteCsvReader {
    /// Reads a props file.
    ///
    /// Format: week,game,player_name,team_name,team_logo,prop_type,line,over_odds,under_odds,sportsbook[,scrape_timestamp]
    ///
    /// Rows that fail to deserialize are logged and skipped. Exact duplicate
    /// rows are dropped, keeping the first.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or its header cannot be read
    pub fn read_quotes(path: impl AsRef<Path>) -> Result<Vec<RawQuote>> {
        let quotes: Vec<RawQuote> = read_records(path.as_ref())?;
        Ok(dedup(quotes))
    }

    /// Reads a game-lines file.
    ///
    /// Format: week,game,away_team,home_team,away_spread_line,away_spread_odds,home_spread_line,home_spread_odds,away_moneyline,home_moneyline,total_line,over_odds,under_odds[,scrape_timestamp]
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or its header cannot be read
    pub fn read_game_lines(path: impl AsRef<Path>) -> Result<Vec<RawGameLine>> {
        let lines: Vec<RawGameLine> = read_records(path.as_ref())?;
        Ok(dedup(lines))
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    // Fail fast on an unreadable header; bad rows only skip themselves.
    reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                // Header is line 1
                warn!(
                    file = %path.display(),
                    line = index + 2,
                    error = %e,
                    "Skipping malformed CSV row"
                );
            }
        }
    }

    debug!(
        file = %path.display(),
        rows = records.len(),
        skipped = skipped,
        "Read CSV file"
    );
    Ok(records)
}

/// Drops exact duplicates, keeping first-seen order.
pub(crate) fn dedup<T: Clone + Eq + Hash>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let a = RawQuote::new("FanDuel", "A @ B", "John Smith", "Receptions").with_line("5.5");
        let b = RawQuote::new("FanDuel", "A @ B", "John Smith", "Receptions").with_line("6.5");

        let out = dedup(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = QuoteCsvReader::read_quotes("/nonexistent/props.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }
}
