//! Ingestion of scraped sportsbook exports.
//!
//! This crate provides:
//! - CSV readers for props files (legacy and history shapes) and game lines
//! - A JSON loader for prop records
//! - Input sets that gather one week's files into raw records

pub mod csv_reader;
pub mod input_set;
pub mod json_loader;

// Re-export commonly used types
pub use csv_reader::QuoteCsvReader;
pub use input_set::{InputKind, InputSet};
pub use json_loader::load_json_quotes;
