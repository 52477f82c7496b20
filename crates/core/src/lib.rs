//! Shared records and configuration for the propline workspace.

pub mod config;
pub mod config_loader;
pub mod records;

pub use config::{AppConfig, DetectionConfig, LineThresholds, NormalizerTables, QualifierMarker};
pub use config_loader::ConfigLoader;
pub use records::{RawGameLine, RawQuote};
