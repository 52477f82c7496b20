use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use propline_core::{RawGameLine, RawQuote};
use tracing::{debug, info, warn};

use crate::csv_reader::{dedup, QuoteCsvReader};
use crate::json_loader::load_json_quotes;

/// What a scraper export holds, judged by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Player-prop CSV (legacy or history shape).
    Props,
    /// Spread / moneyline / total CSV.
    GameLines,
    /// JSON array of prop records.
    JsonQuotes,
}

impl InputKind {
    /// Classifies a path.
    ///
    /// `*game_lines*` files are game lines, `.json` files are prop records
    /// and any other `.csv` file is a props file.
    ///
    /// # Errors
    /// Returns error for any other extension
    pub fn classify(path: &Path) -> Result<Self> {
        let name = file_name(path).to_lowercase();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("csv") if name.contains("game_lines") => Ok(Self::GameLines),
            Some("csv") => Ok(Self::Props),
            Some("json") => Ok(Self::JsonQuotes),
            _ => bail!("Unsupported input file (expected .csv or .json): {}", path.display()),
        }
    }
}

/// Every record of one scan window, gathered from scraper exports.
#[derive(Debug, Clone, Default)]
pub struct InputSet {
    pub quotes: Vec<RawQuote>,
    pub game_lines: Vec<RawGameLine>,
    /// Week parsed from the file names, when they carry one.
    pub week: Option<u32>,
    pub files: Vec<PathBuf>,
}

impl InputSet {
    /// Reads and concatenates every file, in the order given, then drops
    /// exact duplicate records across all files (first seen wins).
    ///
    /// # Errors
    /// Returns error if any file cannot be classified, opened or parsed
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut set = Self::default();

        for path in paths {
            let path = path.as_ref();
            match InputKind::classify(path)? {
                InputKind::Props => set.quotes.extend(QuoteCsvReader::read_quotes(path)?),
                InputKind::GameLines => {
                    set.game_lines.extend(QuoteCsvReader::read_game_lines(path)?);
                }
                InputKind::JsonQuotes => set.quotes.extend(load_json_quotes(path)?),
            }

            if let Some(week) = week_from_file_name(&file_name(path)) {
                match set.week {
                    None => set.week = Some(week),
                    Some(existing) if existing != week => warn!(
                        file = %path.display(),
                        week = week,
                        keeping = existing,
                        "Input files disagree on week"
                    ),
                    Some(_) => {}
                }
            }
            set.files.push(path.to_path_buf());
        }

        // Scrapers re-export overlapping snapshots, so duplicates span files.
        let (quotes, game_lines) = (set.quotes.len(), set.game_lines.len());
        set.quotes = dedup(set.quotes);
        set.game_lines = dedup(set.game_lines);
        debug!(
            duplicate_quotes = quotes - set.quotes.len(),
            duplicate_game_lines = game_lines - set.game_lines.len(),
            "Dropped duplicates across files"
        );

        info!(
            files = set.files.len(),
            quotes = set.quotes.len(),
            game_lines = set.game_lines.len(),
            week = ?set.week,
            "Loaded inputs"
        );
        Ok(set)
    }

    /// Describes the window for logs and errors.
    #[must_use]
    pub fn window(&self) -> String {
        match self.week {
            Some(week) => format!("week {week}"),
            None => {
                let names: Vec<String> = self.files.iter().map(|p| file_name(p)).collect();
                if names.is_empty() {
                    "no input files".to_string()
                } else {
                    names.join(", ")
                }
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parses `N` out of names like `fanduel_nfl_week_7_props_history.csv`.
fn week_from_file_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    lower.match_indices("week_").find_map(|(start, marker)| {
        let digits: String = lower[start + marker.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    })
}
