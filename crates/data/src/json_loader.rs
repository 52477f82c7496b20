use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use propline_core::RawQuote;
use tracing::debug;

/// Loads a JSON array of raw quote records.
///
/// Odds and lines may be written as numbers or strings.
///
/// # Errors
/// Returns error if the file cannot be opened or is not a JSON array of quotes
pub fn load_json_quotes(path: impl AsRef<Path>) -> Result<Vec<RawQuote>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;

    let quotes: Vec<RawQuote> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse quote records from {}", path.display()))?;

    debug!(file = %path.display(), rows = quotes.len(), "Read JSON file");
    Ok(quotes)
}
