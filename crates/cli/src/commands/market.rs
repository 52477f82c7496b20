//! Cross-book market view.

use anyhow::Result;
use clap::Args;

use super::output::{self, OutputFormat};
use super::pass::{run_pass, GlobalOpts, InputArgs};

/// Arguments for the market command.
#[derive(Args, Debug, Clone)]
pub struct MarketArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Runs the market command.
///
/// # Errors
/// Returns an error if config or inputs cannot be loaded, or the window is empty.
pub async fn run_market(opts: &GlobalOpts, args: MarketArgs) -> Result<()> {
    let config = opts.load_config()?;
    let report = run_pass(&config, &args.inputs).await?;

    match opts.format {
        OutputFormat::Table => output::print_market(&report.market),
        OutputFormat::Json => output::print_json(&report.market)?,
    }

    Ok(())
}
