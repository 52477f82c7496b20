//! Shared plumbing for every command: config, inputs and one scan pass.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use propline_core::{AppConfig, ConfigLoader};
use propline_data::InputSet;
use propline_engine::{DetectorOutput, MarketScanner, ScanReport};
use tracing::{error, info};

use super::output::OutputFormat;

/// Options that apply to every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config_path: PathBuf,
    pub format: OutputFormat,
}

impl GlobalOpts {
    /// Validates the raw flag values.
    ///
    /// # Errors
    /// Returns an error if the output format is unknown.
    pub fn new(config_path: PathBuf, format: &str) -> Result<Self> {
        Ok(Self {
            config_path,
            format: OutputFormat::parse(format)?,
        })
    }

    /// Loads configuration from the config path.
    ///
    /// # Errors
    /// Returns an error if the config file or environment overrides are invalid.
    pub fn load_config(&self) -> Result<AppConfig> {
        ConfigLoader::load_from(&self.config_path)
    }
}

/// Scraper exports to read.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Props CSV, game-lines CSV or props JSON files for one window
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Loads the inputs and runs one full pass.
///
/// Detectors run concurrently on blocking threads over one shared store.
///
/// # Errors
/// Returns an error if inputs cannot be read, the config is rejected, or the
/// window holds no quotes.
pub async fn run_pass(config: &AppConfig, inputs: &InputArgs) -> Result<ScanReport> {
    let paths = inputs.inputs.clone();
    let input_set = tokio::task::spawn_blocking(move || InputSet::from_paths(&paths))
        .await
        .context("Input loading task failed")??;
    let window = input_set.window();

    let scanner = Arc::new(MarketScanner::from_config(config)?);

    let store = match scanner.build_store(&input_set.quotes, &window) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(window = %window, "No data to scan");
            return Err(e.into());
        }
    };

    info!(
        window = %window,
        quotes = store.len(),
        sportsbooks = store.sportsbooks().len(),
        "Running detectors"
    );

    let arbitrage = {
        let (scanner, store) = (Arc::clone(&scanner), Arc::clone(&store));
        tokio::task::spawn_blocking(move || scanner.arbitrage().detect(&store))
    };
    let value = {
        let (scanner, store) = (Arc::clone(&scanner), Arc::clone(&store));
        tokio::task::spawn_blocking(move || scanner.value().detect(&store))
    };
    let movements = {
        let (scanner, store) = (Arc::clone(&scanner), Arc::clone(&store));
        tokio::task::spawn_blocking(move || scanner.movement().track(&store))
    };

    let (arbitrage, value, movements) =
        tokio::try_join!(arbitrage, value, movements).context("Detector task failed")?;

    let output = DetectorOutput {
        arbitrage,
        value,
        movements,
    };
    let mut report = scanner.assemble(&store, &input_set.quotes, &input_set.game_lines, output);
    // Records without a week column fall back to the file names
    report.week = report.week.or(input_set.week);

    Ok(report)
}
