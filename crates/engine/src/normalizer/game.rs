//! Team names and orientation-independent game keys.

use std::collections::BTreeMap;

/// Delimiters between the two teams, in priority order. Matched
/// case-insensitively.
const MATCHUP_DELIMITERS: [&str; 4] = [" @ ", " vs. ", " vs ", " v "];

/// Expands a team name or abbreviation to its canonical full name.
///
/// Unknown names pass through with whitespace collapsed.
#[must_use]
pub fn canonical_team(raw: &str, aliases: &BTreeMap<String, String>) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    aliases
        .get(&collapsed.to_lowercase())
        .cloned()
        .unwrap_or(collapsed)
}

/// Splits "away @ home" (or "A vs B") into its two sides.
#[must_use]
pub fn split_matchup(raw: &str) -> Option<(&str, &str)> {
    let lowered = raw.to_ascii_lowercase();
    MATCHUP_DELIMITERS.iter().find_map(|delimiter| {
        lowered.find(delimiter).map(|idx| {
            let first = raw[..idx].trim();
            let second = raw[idx + delimiter.len()..].trim();
            (first, second)
        })
    })
}

/// Builds a game key that does not depend on home/away orientation.
///
/// Both teams are expanded to full names, sorted and rejoined with " @ ", so
/// `game_key("A @ B") == game_key("B @ A")`. Text without a recognized
/// delimiter passes through with whitespace collapsed.
#[must_use]
pub fn game_key(raw: &str, aliases: &BTreeMap<String, String>) -> String {
    match split_matchup(raw) {
        Some((first, second)) if !first.is_empty() && !second.is_empty() => {
            let mut teams = [
                canonical_team(first, aliases),
                canonical_team(second, aliases),
            ];
            teams.sort();
            format!("{} @ {}", teams[0], teams[1])
        }
        _ => raw.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}
