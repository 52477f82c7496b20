//! Line movement listing.

use anyhow::Result;
use clap::Args;

use super::output::{self, OutputFormat};
use super::pass::{run_pass, GlobalOpts, InputArgs};

/// Arguments for the movement command.
#[derive(Args, Debug, Clone)]
pub struct MovementArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Maximum moves to list (overrides config)
    #[arg(long)]
    pub top_n: Option<usize>,
}

/// Runs the movement command.
///
/// Needs history exports (files with `scrape_timestamp`); single-snapshot
/// inputs list nothing.
///
/// # Errors
/// Returns an error if config or inputs cannot be loaded, or the window is empty.
pub async fn run_movement(opts: &GlobalOpts, args: MovementArgs) -> Result<()> {
    let mut config = opts.load_config()?;
    if let Some(top_n) = args.top_n {
        config.detection = config.detection.with_top_n(top_n);
    }
    let report = run_pass(&config, &args.inputs).await?;

    if !report.summary.has_history {
        tracing::warn!("Inputs carry no scrape timestamps; no movement to track");
    }

    match opts.format {
        OutputFormat::Table => output::print_movements(&report.movements),
        OutputFormat::Json => output::print_json(&report.movements)?,
    }

    Ok(())
}
