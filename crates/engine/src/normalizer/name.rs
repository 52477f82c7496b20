//! Player name keys and corrupted-name recovery.

use std::collections::HashMap;

use propline_core::RawQuote;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::Sportsbook;

/// Folds a player name into its matching key.
///
/// Decomposes and strips diacritics, spells out Latin letters that do not
/// decompose (ø, ß, ł and friends), lowercases to ASCII, drops periods and
/// apostrophes, turns other punctuation into spaces and removes trailing
/// generational suffixes. A name made only of a suffix keeps it. Letters
/// outside the Latin script are dropped.
///
/// ```text
/// "Amon-Ra St. Brown"   -> "amon ra st brown"
/// "Kenneth Walker III"  -> "kenneth walker"
/// "Ja'Marr Chase"       -> "jamarr chase"
/// "Søren Bjørnsson"     -> "soren bjornsson"
/// ```
#[must_use]
pub fn player_key(raw: &str, suffixes: &[String]) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.nfkd().filter(|c| !is_combining_mark(*c)) {
        match c {
            '.' | '\'' | '\u{2019}' | '`' => {}
            c if c.is_ascii_alphanumeric() => cleaned.push(c.to_ascii_lowercase()),
            c if c.is_whitespace() || c.is_ascii_punctuation() => cleaned.push(' '),
            c => {
                if let Some(spelled) = transliterate(c) {
                    cleaned.push_str(spelled);
                }
            }
        }
    }

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    while tokens.len() > 1
        && tokens
            .last()
            .is_some_and(|last| suffixes.iter().any(|s| s == last))
    {
        tokens.pop();
    }
    tokens.join(" ")
}

/// ASCII spelling of Latin letters that NFKD leaves whole.
fn transliterate(c: char) -> Option<&'static str> {
    let spelled = match c {
        'ø' | 'Ø' => "o",
        'ß' | 'ẞ' => "ss",
        'ł' | 'Ł' => "l",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'þ' | 'Þ' => "th",
        'ı' => "i",
        'ħ' | 'Ħ' => "h",
        _ => return None,
    };
    Some(spelled)
}

// =============================================================================
// Name Resolution
// =============================================================================

/// Outcome of resolving a raw player field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolution {
    /// Player name to display and key on.
    pub name: String,
    /// Text trailing the recovered name (typically a prop description).
    pub remainder: Option<String>,
    /// False when the raw text stands in as the name (degraded mode).
    pub resolved: bool,
}

impl NameResolution {
    /// The raw text stands as the name.
    #[must_use]
    pub fn unresolved(raw: &str) -> Self {
        Self {
            name: raw.trim().to_string(),
            remainder: None,
            resolved: false,
        }
    }
}

/// Resolves raw player text to a canonical player name.
///
/// Implementations must be pure: the same input always yields the same
/// resolution.
pub trait NameResolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, raw: &str) -> NameResolution;

    /// Returns a resolver that also knows the clean names in `records`
    /// emitted by `trusted`, or `None` if this resolver does not learn.
    fn harvest(&self, _records: &[RawQuote], _trusted: &Sportsbook) -> Option<Box<dyn NameResolver>> {
        None
    }
}

/// Takes every player field at face value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl NameResolver for PassthroughResolver {
    fn resolve(&self, raw: &str) -> NameResolution {
        NameResolution {
            name: raw.trim().to_string(),
            remainder: None,
            resolved: true,
        }
    }
}

/// Recovers names from corrupted player fields by longest known-name prefix.
///
/// Known names are harvested from a trusted sportsbook whose player field is
/// clean. Prefixes are compared on whole words after key folding, so
/// "John Smith Jr. Pass Yds O/U" resolves to "John Smith Jr." with remainder
/// "Pass Yds O/U".
#[derive(Debug, Clone, Default)]
pub struct PrefixNameResolver {
    /// Name key to clean display name.
    known: HashMap<String, String>,
    suffixes: Vec<String>,
}

impl PrefixNameResolver {
    /// Creates a resolver over a set of clean names.
    #[must_use]
    pub fn new<I, S>(names: I, suffixes: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = HashMap::new();
        for name in names {
            let name = name.as_ref().trim();
            let key = player_key(name, suffixes);
            if !key.is_empty() {
                known.entry(key).or_insert_with(|| name.to_string());
            }
        }
        Self {
            known,
            suffixes: suffixes.to_vec(),
        }
    }

    /// Builds a resolver from the trusted sportsbook's records.
    #[must_use]
    pub fn from_records(records: &[RawQuote], trusted: &Sportsbook, suffixes: &[String]) -> Self {
        Self::new(trusted_names(records, trusted), suffixes)
    }

    /// Number of known clean names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

fn trusted_names<'a>(
    records: &'a [RawQuote],
    trusted: &'a Sportsbook,
) -> impl Iterator<Item = &'a str> + 'a {
    records
        .iter()
        .filter(move |r| &Sportsbook::from_name(&r.sportsbook) == trusted)
        .map(|r| r.player_name.as_str())
}

impl NameResolver for PrefixNameResolver {
    fn harvest(&self, records: &[RawQuote], trusted: &Sportsbook) -> Option<Box<dyn NameResolver>> {
        let mut merged = self.clone();
        for name in trusted_names(records, trusted) {
            let name = name.trim();
            let key = player_key(name, &self.suffixes);
            if !key.is_empty() {
                merged.known.entry(key).or_insert_with(|| name.to_string());
            }
        }

        tracing::debug!(
            trusted = %trusted,
            known_names = merged.known.len(),
            "Harvested clean player names"
        );
        Some(Box::new(merged))
    }

    fn resolve(&self, raw: &str) -> NameResolution {
        let tokens: Vec<&str> = raw.split_whitespace().collect();

        for end in (1..=tokens.len()).rev() {
            let key = player_key(&tokens[..end].join(" "), &self.suffixes);
            if let Some(clean) = self.known.get(&key) {
                let rest = tokens[end..].join(" ");
                return NameResolution {
                    name: clean.clone(),
                    remainder: (!rest.is_empty()).then_some(rest),
                    resolved: true,
                };
            }
        }

        tracing::trace!(raw = %raw, "No known player name prefix");
        NameResolution::unresolved(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> Vec<String> {
        ["jr", "sr", "ii", "iii", "iv", "v"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    // ==================== Player Key Tests ====================

    #[test]
    fn test_player_key_basic() {
        assert_eq!(player_key("Patrick Mahomes", &suffixes()), "patrick mahomes");
        assert_eq!(player_key("  Josh   Allen ", &suffixes()), "josh allen");
    }

    #[test]
    fn test_player_key_strips_diacritics() {
        assert_eq!(player_key("José Ramírez", &suffixes()), "jose ramirez");
        assert_eq!(
            player_key("Jose Ramirez", &suffixes()),
            player_key("José Ramírez", &suffixes())
        );
    }

    #[test]
    fn test_player_key_spells_out_undecomposable_letters() {
        assert_eq!(player_key("Søren", &suffixes()), player_key("Soren", &suffixes()));
        assert_eq!(player_key("Søren Bjørnsson", &suffixes()), "soren bjornsson");
        assert_eq!(player_key("Jan Błachowicz", &suffixes()), "jan blachowicz");
        assert_eq!(player_key("Max Weiß", &suffixes()), "max weiss");
        assert_eq!(player_key("ÆSIR ØDEGAARD", &suffixes()), "aesir odegaard");
        assert_eq!(player_key("Luka Dončić", &suffixes()), "luka doncic");
    }

    #[test]
    fn test_player_key_drops_suffixes_periods_apostrophes() {
        assert_eq!(player_key("Marvin Harrison Jr.", &suffixes()), "marvin harrison");
        assert_eq!(player_key("Kenneth Walker III", &suffixes()), "kenneth walker");
        assert_eq!(player_key("Ja'Marr Chase", &suffixes()), "jamarr chase");
        assert_eq!(player_key("Ja\u{2019}Marr Chase", &suffixes()), "jamarr chase");
        assert_eq!(player_key("D.J. Moore", &suffixes()), "dj moore");
        assert_eq!(player_key("DJ Moore", &suffixes()), "dj moore");
    }

    #[test]
    fn test_player_key_hyphen_becomes_space() {
        assert_eq!(player_key("Amon-Ra St. Brown", &suffixes()), "amon ra st brown");
    }

    #[test]
    fn test_player_key_suffix_only_name_kept() {
        assert_eq!(player_key("Jr.", &suffixes()), "jr");
    }

    #[test]
    fn test_player_key_idempotent() {
        for name in ["Amon-Ra St. Brown", "Kenneth Walker III", "José Ramírez", "Søren", "Jr."] {
            let once = player_key(name, &suffixes());
            assert_eq!(player_key(&once, &suffixes()), once);
        }
    }

    // ==================== Resolver Tests ====================

    #[test]
    fn test_prefix_resolver_recovers_name() {
        let resolver = PrefixNameResolver::new(["John Smith", "Josh Allen"], &suffixes());
        let resolution = resolver.resolve("John Smith Pass Yds O/U");

        assert!(resolution.resolved);
        assert_eq!(resolution.name, "John Smith");
        assert_eq!(resolution.remainder.as_deref(), Some("Pass Yds O/U"));
    }

    #[test]
    fn test_prefix_resolver_longest_prefix_wins() {
        let resolver =
            PrefixNameResolver::new(["John Smith", "John Smith Jr."], &suffixes());
        // Both keys fold to "john smith"; the first clean spelling is kept
        let resolution = resolver.resolve("John Smith Jr. Receptions");
        assert_eq!(resolution.name, "John Smith");
        assert_eq!(resolution.remainder.as_deref(), Some("Receptions"));

        let resolver = PrefixNameResolver::new(["Mike Williams", "Mike"], &suffixes());
        let resolution = resolver.resolve("Mike Williams Rec Yds");
        assert_eq!(resolution.name, "Mike Williams");
    }

    #[test]
    fn test_prefix_resolver_clean_name() {
        let resolver = PrefixNameResolver::new(["Josh Allen"], &suffixes());
        let resolution = resolver.resolve("Josh Allen");
        assert!(resolution.resolved);
        assert!(resolution.remainder.is_none());
    }

    #[test]
    fn test_prefix_resolver_accent_insensitive() {
        let resolver = PrefixNameResolver::new(["José Ramírez"], &suffixes());
        let resolution = resolver.resolve("Jose Ramirez Rush Yds");
        assert_eq!(resolution.name, "José Ramírez");
    }

    #[test]
    fn test_prefix_resolver_matches_transliterated_names() {
        let resolver = PrefixNameResolver::new(["Søren Bjørnsson"], &suffixes());
        let resolution = resolver.resolve("Soren Bjornsson Rec Yds");
        assert!(resolution.resolved);
        assert_eq!(resolution.name, "Søren Bjørnsson");
        assert_eq!(resolution.remainder.as_deref(), Some("Rec Yds"));
    }

    #[test]
    fn test_prefix_resolver_degraded_mode() {
        let resolver = PrefixNameResolver::new(["Josh Allen"], &suffixes());
        let resolution = resolver.resolve("Unknown Player Pass Yds O/U");

        assert!(!resolution.resolved);
        assert_eq!(resolution.name, "Unknown Player Pass Yds O/U");
        assert!(resolution.remainder.is_none());
    }

    #[test]
    fn test_harvest_uses_trusted_book_only() {
        let records = vec![
            RawQuote::new("FanDuel", "A @ B", "Josh Allen", "Passing Yds"),
            RawQuote::new("DraftKings", "A @ B", "Bogus Name Pass Yds", "Passing Props"),
        ];
        let resolver =
            PrefixNameResolver::from_records(&records, &Sportsbook::FanDuel, &suffixes());
        assert_eq!(resolver.len(), 1);
        assert!(!resolver.resolve("Bogus Name Pass Yds").resolved);
    }

    #[test]
    fn test_harvest_keeps_seeded_names() {
        let seeded = PrefixNameResolver::new(["Derrick Henry"], &suffixes());
        let records = vec![RawQuote::new("FanDuel", "A @ B", "Josh Allen", "Passing Yds")];

        let harvested = seeded
            .harvest(&records, &Sportsbook::FanDuel)
            .expect("prefix resolver learns");
        assert!(harvested.resolve("Derrick Henry Rush Yds").resolved);
        assert!(harvested.resolve("Josh Allen Pass Yds").resolved);
        assert!(PassthroughResolver.harvest(&records, &Sportsbook::FanDuel).is_none());
    }

    #[test]
    fn test_passthrough_resolver() {
        let resolution = PassthroughResolver.resolve("  Josh Allen ");
        assert_eq!(resolution.name, "Josh Allen");
        assert!(resolution.resolved);
    }
}
