//! Prop-type parsing into `(prop_main, prop_qualifier)`.
//!
//! ```text
//! "1st Qtr Passing Yds"         -> ("Passing Yards", "1st Quarter")
//! "Pass Yds O/U"                -> ("Passing Yards", "Full Game")
//! "Longest Reception"           -> ("Longest Reception", "")
//! "Yds" under "Passing Props"   -> ("Passing Yards", "Full Game")
//! ""                            -> ("Unknown Prop", "")
//! ```

use propline_core::{NormalizerTables, QualifierMarker};
use serde::Serialize;

use crate::types::{prop_label, FULL_GAME, UNKNOWN_PROP};

const LONGEST: &str = "Longest";

/// Tokens dropped as generic over/under markers.
const OVER_UNDER_TOKENS: [&str; 2] = ["o/u", "over/under"];

/// Tokens dropped as separators.
const SEPARATOR_TOKENS: [&str; 4] = ["-", "\u{2013}", "|", ":"];

/// Canonical prop category and qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropKey {
    pub main: String,
    pub qualifier: String,
}

impl PropKey {
    #[must_use]
    pub fn new(main: &str, qualifier: &str) -> Self {
        Self {
            main: main.to_string(),
            qualifier: qualifier.to_string(),
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_PROP, "")
    }

    #[must_use]
    pub fn label(&self) -> String {
        prop_label(&self.main, &self.qualifier)
    }
}

/// Returns the stat family prefix when `prop_type` is a category tab such as
/// "Passing Props".
#[must_use]
pub fn category_context<'a>(prop_type: &str, tables: &'a NormalizerTables) -> Option<&'a str> {
    let key = prop_type.split_whitespace().collect::<Vec<_>>().join(" ");
    tables
        .category_contexts
        .get(&key.to_lowercase())
        .map(String::as_str)
}

/// Parses free prop text. Total: every input yields a key.
///
/// `markers` must be in precedence order (see
/// [`NormalizerTables::markers_by_precedence`]).
#[must_use]
pub fn parse_prop(
    text: &str,
    context: Option<&str>,
    tables: &NormalizerTables,
    markers: &[QualifierMarker],
) -> PropKey {
    let spaced = text.replace(['(', ')'], " ");
    let mut tokens: Vec<&str> = spaced
        .split_whitespace()
        .filter(|t| !SEPARATOR_TOKENS.contains(t))
        .collect();

    let is_longest = tokens.iter().any(|t| t.eq_ignore_ascii_case(LONGEST));
    let qualifier = if is_longest {
        tokens.retain(|t| !t.eq_ignore_ascii_case(LONGEST));
        LONGEST.to_string()
    } else {
        extract_qualifier(&mut tokens, markers).unwrap_or_else(|| FULL_GAME.to_string())
    };

    tokens.retain(|t| {
        !OVER_UNDER_TOKENS
            .iter()
            .any(|ou| t.eq_ignore_ascii_case(ou))
    });

    let remaining = tokens.join(" ");
    if remaining.is_empty() || remaining == UNKNOWN_PROP {
        return PropKey::unknown();
    }

    let main = resolve_alias(&remaining, context, tables);

    if is_longest {
        let folded = tables
            .longest_folds
            .get(&main)
            .cloned()
            .unwrap_or_else(|| format!("{LONGEST} {main}"));
        return PropKey::new(&folded, "");
    }

    PropKey {
        main,
        qualifier,
    }
}

/// Removes the first marker found (in precedence order) and returns its
/// canonical label. Markers match whole tokens, case-insensitively.
fn extract_qualifier(tokens: &mut Vec<&str>, markers: &[QualifierMarker]) -> Option<String> {
    for marker in markers {
        let words: Vec<&str> = marker.pattern.split_whitespace().collect();
        if words.is_empty() || words.len() > tokens.len() {
            continue;
        }
        let found = (0..=tokens.len() - words.len()).find(|&start| {
            words
                .iter()
                .zip(&tokens[start..start + words.len()])
                .all(|(w, t)| w.eq_ignore_ascii_case(t))
        });
        if let Some(start) = found {
            tokens.drain(start..start + words.len());
            return Some(marker.label.clone());
        }
    }
    None
}

/// Maps a book label to its canonical category, trying the category context
/// first. Unmatched labels pass through unchanged.
fn resolve_alias(label: &str, context: Option<&str>, tables: &NormalizerTables) -> String {
    let lowered = label.to_lowercase();
    if let Some(prefix) = context {
        let contextual = format!("{} {}", prefix.to_lowercase(), lowered);
        if let Some(canonical) = tables.prop_aliases.get(&contextual) {
            return canonical.clone();
        }
    }
    tables
        .prop_aliases
        .get(&lowered)
        .cloned()
        .unwrap_or_else(|| label.to_string())
}
