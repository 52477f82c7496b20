use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Book whose player names are trusted as clean (used for name recovery
    /// and team enrichment).
    pub trusted_sportsbook: String,
    pub normalizer: NormalizerTables,
    pub detection: DetectionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            trusted_sportsbook: "FanDuel".to_string(),
            normalizer: NormalizerTables::default(),
            detection: DetectionConfig::default(),
        }
    }
}

// =============================================================================
// Normalizer Tables
// =============================================================================

/// One qualifier marker: a phrase found in prop text and the canonical
/// qualifier label it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifierMarker {
    pub pattern: String,
    pub label: String,
}

impl QualifierMarker {
    #[must_use]
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }
}

/// Lookup tables driving name, game and prop normalization.
///
/// New sportsbook phrasings are additions to these tables, not code changes.
/// All lookup keys are lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerTables {
    /// Team alias (lowercase) to canonical full team name.
    pub team_aliases: BTreeMap<String, String>,
    /// Book-specific prop label (lowercase) to canonical stat category.
    pub prop_aliases: BTreeMap<String, String>,
    /// Time-segment markers. Matched longest pattern first; equal lengths
    /// keep table order.
    pub qualifier_markers: Vec<QualifierMarker>,
    /// Canonical category to its "Longest" market label.
    pub longest_folds: BTreeMap<String, String>,
    /// Category tab (lowercase, e.g. "passing props") to the stat family
    /// prefix used to resolve bare labels such as "Yds".
    pub category_contexts: BTreeMap<String, String>,
    /// Trailing name tokens dropped from player keys.
    pub generational_suffixes: Vec<String>,
}

impl Default for NormalizerTables {
    fn default() -> Self {
        Self {
            team_aliases: default_team_aliases(),
            prop_aliases: default_prop_aliases(),
            qualifier_markers: default_qualifier_markers(),
            longest_folds: default_longest_folds(),
            category_contexts: [
                ("passing props", "Passing"),
                ("receiving props", "Receiving"),
                ("rushing props", "Rushing"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            generational_suffixes: ["jr", "sr", "ii", "iii", "iv", "v"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl NormalizerTables {
    /// Returns the qualifier markers in match precedence order: longest
    /// pattern (in words, then characters) first, table order on ties.
    #[must_use]
    pub fn markers_by_precedence(&self) -> Vec<&QualifierMarker> {
        let mut markers: Vec<&QualifierMarker> = self.qualifier_markers.iter().collect();
        markers.sort_by(|a, b| {
            let a_words = a.pattern.split_whitespace().count();
            let b_words = b.pattern.split_whitespace().count();
            b_words
                .cmp(&a_words)
                .then_with(|| b.pattern.len().cmp(&a.pattern.len()))
        });
        markers
    }
}

fn add_team(map: &mut BTreeMap<String, String>, canonical: &str, aliases: &[&str]) {
    map.insert(canonical.to_lowercase(), canonical.to_string());
    for alias in aliases {
        map.insert(alias.to_lowercase(), canonical.to_string());
    }
}

fn default_team_aliases() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    add_team(&mut map, "Arizona Cardinals", &["ari cardinals", "ari", "arizona"]);
    add_team(&mut map, "Atlanta Falcons", &["atl falcons", "atl", "atlanta"]);
    add_team(&mut map, "Baltimore Ravens", &["bal ravens", "bal", "baltimore"]);
    add_team(&mut map, "Buffalo Bills", &["buf bills", "buf", "buffalo"]);
    add_team(&mut map, "Carolina Panthers", &["car panthers", "car", "carolina"]);
    add_team(&mut map, "Chicago Bears", &["chi bears", "chi", "chicago"]);
    add_team(&mut map, "Cincinnati Bengals", &["cin bengals", "cin", "cincinnati"]);
    add_team(&mut map, "Cleveland Browns", &["cle browns", "cle", "cleveland"]);
    add_team(&mut map, "Dallas Cowboys", &["dal cowboys", "dal", "dallas"]);
    add_team(&mut map, "Denver Broncos", &["den broncos", "den", "denver"]);
    add_team(&mut map, "Detroit Lions", &["det lions", "det", "detroit"]);
    add_team(&mut map, "Green Bay Packers", &["gb packers", "gb", "green bay"]);
    add_team(&mut map, "Houston Texans", &["hou texans", "hou", "houston"]);
    add_team(&mut map, "Indianapolis Colts", &["ind colts", "ind", "indianapolis"]);
    add_team(
        &mut map,
        "Jacksonville Jaguars",
        &["jac jaguars", "jax jaguars", "jac", "jax", "jacksonville"],
    );
    add_team(&mut map, "Kansas City Chiefs", &["kc chiefs", "kc", "kansas city"]);
    add_team(&mut map, "Las Vegas Raiders", &["lv raiders", "lv", "las vegas"]);
    add_team(&mut map, "Los Angeles Chargers", &["la chargers", "lac"]);
    add_team(&mut map, "Los Angeles Rams", &["la rams", "lar"]);
    add_team(&mut map, "Miami Dolphins", &["mia dolphins", "mia", "miami"]);
    add_team(&mut map, "Minnesota Vikings", &["min vikings", "min", "minnesota"]);
    add_team(&mut map, "New England Patriots", &["ne patriots", "ne", "new england"]);
    add_team(&mut map, "New Orleans Saints", &["no saints", "no", "new orleans"]);
    add_team(&mut map, "New York Giants", &["ny giants", "nyg"]);
    add_team(&mut map, "New York Jets", &["ny jets", "nyj"]);
    add_team(&mut map, "Philadelphia Eagles", &["phi eagles", "phi", "philadelphia"]);
    add_team(&mut map, "Pittsburgh Steelers", &["pit steelers", "pit", "pittsburgh"]);
    add_team(&mut map, "San Francisco 49ers", &["sf 49ers", "sf", "san francisco"]);
    add_team(&mut map, "Seattle Seahawks", &["sea seahawks", "sea", "seattle"]);
    add_team(&mut map, "Tampa Bay Buccaneers", &["tb buccaneers", "tb", "tampa bay"]);
    add_team(&mut map, "Tennessee Titans", &["ten titans", "ten", "tennessee"]);
    add_team(
        &mut map,
        "Washington Commanders",
        &["was commanders", "wsh commanders", "was", "wsh", "washington"],
    );
    map
}

fn add_prop(map: &mut BTreeMap<String, String>, canonical: &str, aliases: &[&str]) {
    for alias in aliases {
        map.insert(alias.to_lowercase(), canonical.to_string());
    }
}

fn default_prop_aliases() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    add_prop(
        &mut map,
        "Passing Yards",
        &["pass yds", "passing yds", "pass yards", "passing yds.", "passing yards"],
    );
    add_prop(
        &mut map,
        "Passing Touchdowns",
        &["passing tds", "pass tds", "passing td", "passing touchdowns"],
    );
    add_prop(
        &mut map,
        "Passing Completions",
        &[
            "pass completions",
            "passing completions",
            "completions",
            "pass comp",
            "completion",
            "pass completion",
            "passing completion",
            "pass",
        ],
    );
    add_prop(
        &mut map,
        "Passing Attempts",
        &["pass attempts", "passing attempts", "pass att", "attempts"],
    );
    add_prop(&mut map, "Interceptions", &["interceptions thrown", "pass ints", "ints"]);
    add_prop(
        &mut map,
        "Passing + Rushing Yards",
        &["pass + rushing yds", "pass + rush yds", "passing + rushing yds"],
    );
    add_prop(
        &mut map,
        "Receiving Yards",
        &["receiving yds", "rec yds", "rec yards", "receiving yards"],
    );
    add_prop(
        &mut map,
        "Receptions",
        &["total receptions", "receptions", "reception", "rec"],
    );
    add_prop(
        &mut map,
        "Receiving Touchdowns",
        &["receiving tds", "rec tds", "receiving td"],
    );
    add_prop(
        &mut map,
        "Rushing Yards",
        &["rushing yds", "rush yds", "rush yards", "rushing yards", "rush"],
    );
    add_prop(
        &mut map,
        "Rushing Attempts",
        &["rushing attempts", "rush attempts", "carries"],
    );
    add_prop(&mut map, "Rushing Touchdowns", &["rushing tds", "rush tds", "rushing td"]);
    add_prop(
        &mut map,
        "Rushing + Receiving Yards",
        &["rush + rec yds", "rushing + receiving yds", "rush + rec yards"],
    );
    // Bare labels qualified by a category tab context ("passing yds").
    add_prop(&mut map, "Passing Yards", &["passing yds"]);
    add_prop(&mut map, "Passing Touchdowns", &["passing tds"]);
    add_prop(&mut map, "Passing Attempts", &["passing att"]);
    add_prop(&mut map, "Passing Completions", &["passing comp", "passing completions"]);
    add_prop(&mut map, "Receiving Yards", &["receiving yds", "receiving yards"]);
    add_prop(&mut map, "Receiving Touchdowns", &["receiving tds"]);
    add_prop(&mut map, "Rushing Yards", &["rushing yds", "rushing yards"]);
    add_prop(&mut map, "Rushing Touchdowns", &["rushing tds"]);
    add_prop(&mut map, "Rushing Attempts", &["rushing att"]);
    map
}

fn default_qualifier_markers() -> Vec<QualifierMarker> {
    vec![
        QualifierMarker::new("Full Game", "Full Game"),
        QualifierMarker::new("1st Half", "1st Half"),
        QualifierMarker::new("First Half", "1st Half"),
        QualifierMarker::new("1H", "1st Half"),
        QualifierMarker::new("2nd Half", "2nd Half"),
        QualifierMarker::new("Second Half", "2nd Half"),
        QualifierMarker::new("2H", "2nd Half"),
        QualifierMarker::new("1st Quarter", "1st Quarter"),
        QualifierMarker::new("First Quarter", "1st Quarter"),
        QualifierMarker::new("1st Qtr", "1st Quarter"),
        QualifierMarker::new("1Q", "1st Quarter"),
        QualifierMarker::new("2nd Quarter", "2nd Quarter"),
        QualifierMarker::new("Second Quarter", "2nd Quarter"),
        QualifierMarker::new("2nd Qtr", "2nd Quarter"),
        QualifierMarker::new("2Q", "2nd Quarter"),
        QualifierMarker::new("3rd Quarter", "3rd Quarter"),
        QualifierMarker::new("Third Quarter", "3rd Quarter"),
        QualifierMarker::new("3rd Qtr", "3rd Quarter"),
        QualifierMarker::new("3Q", "3rd Quarter"),
        QualifierMarker::new("4th Quarter", "4th Quarter"),
        QualifierMarker::new("Fourth Quarter", "4th Quarter"),
        QualifierMarker::new("4th Qtr", "4th Quarter"),
        QualifierMarker::new("4Q", "4th Quarter"),
    ]
}

fn default_longest_folds() -> BTreeMap<String, String> {
    [
        ("Receiving Yards", "Longest Reception"),
        ("Receptions", "Longest Reception"),
        ("Rushing Yards", "Longest Rush"),
        ("Passing Completions", "Longest Completion"),
        ("Passing Yards", "Longest Completion"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// =============================================================================
// Detection Configuration
// =============================================================================

/// Per-category minimum line gap for middles and line movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineThresholds {
    /// Threshold for categories not listed in `by_prop`.
    pub default: Decimal,
    /// Canonical category to threshold.
    pub by_prop: BTreeMap<String, Decimal>,
}

impl Default for LineThresholds {
    fn default() -> Self {
        let by_prop = [
            ("Passing Yards", dec!(10.0)),
            ("Passing + Rushing Yards", dec!(10.0)),
            ("Rushing Yards", dec!(5.0)),
            ("Receiving Yards", dec!(5.0)),
            ("Rushing + Receiving Yards", dec!(5.0)),
            ("Receptions", dec!(1.0)),
            ("Passing Touchdowns", dec!(0.5)),
            ("Rushing Touchdowns", dec!(0.5)),
            ("Receiving Touchdowns", dec!(0.5)),
            ("Interceptions", dec!(0.5)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            default: dec!(1.0),
            by_prop,
        }
    }
}

impl LineThresholds {
    /// Returns the threshold for a canonical prop category.
    #[must_use]
    pub fn threshold(&self, prop_main: &str) -> Decimal {
        self.by_prop
            .get(prop_main)
            .copied()
            .unwrap_or(self.default)
    }

    /// Overrides the threshold for one category.
    #[must_use]
    pub fn with_threshold(mut self, prop_main: &str, threshold: Decimal) -> Self {
        self.by_prop.insert(prop_main.to_string(), threshold);
        self
    }
}

/// Knobs shared by the value detector and line movement tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum spread in American-odds points for an odds-shopping entry.
    pub odds_diff_threshold: i32,
    /// Maximum entries kept per ranked list.
    pub top_n: usize,
    pub line_thresholds: LineThresholds,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            odds_diff_threshold: 20,
            top_n: 25,
            line_thresholds: LineThresholds::default(),
        }
    }
}

impl DetectionConfig {
    /// Sets the odds-shopping threshold.
    #[must_use]
    pub fn with_odds_diff_threshold(mut self, threshold: i32) -> Self {
        self.odds_diff_threshold = threshold;
        self
    }

    /// Sets the ranked list size.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sets the line threshold table.
    #[must_use]
    pub fn with_line_thresholds(mut self, thresholds: LineThresholds) -> Self {
        self.line_thresholds = thresholds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let thresholds = LineThresholds::default();
        assert_eq!(thresholds.threshold("Passing Yards"), dec!(10.0));
        assert_eq!(thresholds.threshold("Receptions"), dec!(1.0));
        assert_eq!(thresholds.threshold("Passing Touchdowns"), dec!(0.5));
        assert_eq!(thresholds.threshold("Longest Rush"), dec!(1.0));
    }

    #[test]
    fn test_threshold_override() {
        let thresholds = LineThresholds::default().with_threshold("Receptions", dec!(2.0));
        assert_eq!(thresholds.threshold("Receptions"), dec!(2.0));
    }

    #[test]
    fn test_detection_config_builder() {
        let config = DetectionConfig::default()
            .with_odds_diff_threshold(30)
            .with_top_n(10);

        assert_eq!(config.odds_diff_threshold, 30);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_team_aliases_cover_abbreviations() {
        let tables = NormalizerTables::default();
        assert_eq!(tables.team_aliases["kc chiefs"], "Kansas City Chiefs");
        assert_eq!(tables.team_aliases["jax jaguars"], "Jacksonville Jaguars");
        assert_eq!(tables.team_aliases["kansas city chiefs"], "Kansas City Chiefs");
    }

    #[test]
    fn test_markers_longest_first() {
        let tables = NormalizerTables::default();
        let ordered = tables.markers_by_precedence();

        // Two-word markers precede single tokens such as "1H"
        let first_single = ordered
            .iter()
            .position(|m| m.pattern.split_whitespace().count() == 1)
            .unwrap();
        assert!(ordered[..first_single]
            .iter()
            .all(|m| m.pattern.split_whitespace().count() == 2));

        // Among equal word counts, longer text wins ("Second Quarter" before "1st Qtr")
        let second_quarter = ordered.iter().position(|m| m.pattern == "Second Quarter");
        let first_qtr = ordered.iter().position(|m| m.pattern == "1st Qtr");
        assert!(second_quarter < first_qtr);
    }
}
