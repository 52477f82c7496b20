//! Odds-shopping and line-shopping listing.

use anyhow::Result;
use clap::Args;
use propline_core::AppConfig;
use serde::Serialize;

use super::output::{self, OutputFormat};
use super::pass::{run_pass, GlobalOpts, InputArgs};
use propline_engine::{LineShoppingOpportunity, OddsShoppingOpportunity};

/// Arguments for the value command.
#[derive(Args, Debug, Clone)]
pub struct ValueArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Minimum American-odds point spread between best and worst book
    /// (overrides config)
    #[arg(long)]
    pub odds_threshold: Option<i32>,

    /// Maximum entries per list (overrides config)
    #[arg(long)]
    pub top_n: Option<usize>,
}

impl ValueArgs {
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(threshold) = self.odds_threshold {
            config.detection = config.detection.with_odds_diff_threshold(threshold);
        }
        if let Some(top_n) = self.top_n {
            config.detection = config.detection.with_top_n(top_n);
        }
        config
    }
}

#[derive(Serialize)]
struct ValueOutput<'a> {
    odds_shopping: &'a [OddsShoppingOpportunity],
    line_shopping: &'a [LineShoppingOpportunity],
}

/// Runs the value command.
///
/// # Errors
/// Returns an error if config or inputs cannot be loaded, the overrides are
/// rejected, or the window is empty.
pub async fn run_value(opts: &GlobalOpts, args: ValueArgs) -> Result<()> {
    let config = args.apply(opts.load_config()?);
    let report = run_pass(&config, &args.inputs).await?;

    match opts.format {
        OutputFormat::Table => {
            output::print_odds_shopping(&report.odds_shopping);
            output::print_line_shopping(&report.line_shopping);
        }
        OutputFormat::Json => output::print_json(&ValueOutput {
            odds_shopping: &report.odds_shopping,
            line_shopping: &report.line_shopping,
        })?,
    }

    Ok(())
}
