//! Arbitrage listing.

use anyhow::Result;
use clap::Args;

use super::output::{self, OutputFormat};
use super::pass::{run_pass, GlobalOpts, InputArgs};

/// Arguments for the arbitrage command.
#[derive(Args, Debug, Clone)]
pub struct ArbitrageArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Runs the arbitrage command.
///
/// # Errors
/// Returns an error if config or inputs cannot be loaded, or the window is empty.
pub async fn run_arbitrage(opts: &GlobalOpts, args: ArbitrageArgs) -> Result<()> {
    let config = opts.load_config()?;
    let report = run_pass(&config, &args.inputs).await?;

    match opts.format {
        OutputFormat::Table => output::print_arbitrage(&report.arbitrage),
        OutputFormat::Json => output::print_json(&report.arbitrage)?,
    }

    Ok(())
}
