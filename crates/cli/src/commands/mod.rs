//! CLI commands for the prop reconciliation engine.

pub mod arbitrage;
pub mod market;
pub mod movement;
pub mod output;
pub mod pass;
pub mod scan;
pub mod value;

pub use arbitrage::{run_arbitrage, ArbitrageArgs};
pub use market::{run_market, MarketArgs};
pub use movement::{run_movement, MovementArgs};
pub use pass::GlobalOpts;
pub use scan::{run_scan, ScanArgs};
pub use value::{run_value, ValueArgs};
