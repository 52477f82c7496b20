//! Full scan: every detector plus a summary.

use anyhow::Result;
use clap::Args;

use super::output::{self, OutputFormat};
use super::pass::{run_pass, GlobalOpts, InputArgs};

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Runs the scan command.
///
/// # Errors
/// Returns an error if config or inputs cannot be loaded, or the window is empty.
pub async fn run_scan(opts: &GlobalOpts, args: ScanArgs) -> Result<()> {
    let config = opts.load_config()?;
    let report = run_pass(&config, &args.inputs).await?;

    match opts.format {
        OutputFormat::Table => {
            output::print_summary(&report);
            output::print_arbitrage(&report.arbitrage);
            output::print_odds_shopping(&report.odds_shopping);
            output::print_line_shopping(&report.line_shopping);
            output::print_movements(&report.movements);
        }
        OutputFormat::Json => output::print_json(&report)?,
    }

    Ok(())
}
