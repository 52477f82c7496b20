//! American odds parsing and implied-probability arithmetic.
//!
//! ```text
//! +150  ->  100 / (150 + 100)   = 0.40
//! -150  ->  150 / (150 + 100)   = 0.60
//! ```
//!
//! Odds strictly between -100 and +100 are not valid American odds and are
//! treated as absent everywhere in the engine, as are prices beyond
//! [`MAX_AMERICAN_ODDS`] in either direction.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Unicode minus sign some books use in place of an ASCII hyphen.
const UNICODE_MINUS: char = '\u{2212}';

/// Largest price magnitude accepted (+100000 is a 1000-to-1 shot).
pub const MAX_AMERICAN_ODDS: i32 = 100_000;

/// Parses American odds text.
///
/// Accepts a leading `+`, a Unicode minus, "EVEN"/"EV" (+100) and integral
/// floats such as `-110.0` written by dataframe exports. Anything else,
/// including "N/A", yields `None`, never zero.
#[must_use]
pub fn parse_american_odds(text: &str) -> Option<i32> {
    let cleaned = text.trim().replace(UNICODE_MINUS, "-");
    if cleaned.eq_ignore_ascii_case("even") || cleaned.eq_ignore_ascii_case("ev") {
        return Some(100);
    }

    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let odds = match cleaned.parse::<i32>() {
        Ok(v) => v,
        Err(_) => {
            let value = Decimal::from_str(cleaned).ok()?;
            if !value.fract().is_zero() {
                return None;
            }
            value.to_i32()?
        }
    };

    is_valid_american(odds).then_some(odds)
}

/// Returns true if `odds` is a valid American price
/// (100 <= |odds| <= [`MAX_AMERICAN_ODDS`]).
#[must_use]
pub fn is_valid_american(odds: i32) -> bool {
    (100..=MAX_AMERICAN_ODDS).contains(&odds) || (-MAX_AMERICAN_ODDS..=-100).contains(&odds)
}

/// Converts American odds to implied probability.
///
/// Returns `None` for invalid prices.
#[must_use]
pub fn implied_probability(odds: i32) -> Option<Decimal> {
    if !is_valid_american(odds) {
        return None;
    }
    let odds = Decimal::from(odds);
    if odds > Decimal::ZERO {
        Some(dec!(100) / (odds + dec!(100)))
    } else {
        let risk = odds.abs();
        Some(risk / (risk + dec!(100)))
    }
}

/// Formats odds with an explicit leading `+` for positive prices.
#[must_use]
pub fn format_american_odds(odds: i32) -> String {
    if odds > 0 {
        format!("+{odds}")
    } else {
        odds.to_string()
    }
}
