//! Error types for the reconciliation engine.
//!
//! Malformed records never surface here: they degrade during normalization
//! or are skipped by the detectors. Only whole-pass failures are errors.

use thiserror::Error;

/// Errors that abort a scan pass.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested window holds no quotes.
    #[error("no data for {window}")]
    NoData {
        /// Description of the empty window (week, file set).
        window: String,
    },

    /// Detection settings that cannot produce meaningful output.
    #[error("invalid detection config: {reason}")]
    InvalidConfig {
        /// What is wrong with the settings.
        reason: String,
    },
}

impl EngineError {
    /// Creates a no-data error.
    pub fn no_data(window: impl Into<String>) -> Self {
        Self::NoData {
            window: window.into(),
        }
    }

    /// Creates an invalid-config error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns true for an empty window.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EngineError::no_data("week 7").to_string(), "no data for week 7");
        assert_eq!(
            EngineError::invalid_config("top_n must be positive").to_string(),
            "invalid detection config: top_n must be positive"
        );
    }

    #[test]
    fn test_is_no_data() {
        assert!(EngineError::no_data("week 7").is_no_data());
        assert!(!EngineError::invalid_config("x").is_no_data());
    }
}
