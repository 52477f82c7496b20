use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{ArbitrageArgs, GlobalOpts, MarketArgs, MovementArgs, ScanArgs, ValueArgs};

#[derive(Parser)]
#[command(name = "propline")]
#[command(about = "Cross-sportsbook player prop reconciliation", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "config/Config.toml")]
    config: PathBuf,

    /// Output format: table, json
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every detector and print all results with a summary
    Scan(ScanArgs),
    /// List arbitrage opportunities
    Arbitrage(ArbitrageArgs),
    /// List odds-shopping and line-shopping opportunities
    Value(ValueArgs),
    /// List the largest line moves across scrape snapshots
    Movement(MovementArgs),
    /// Print the cross-book market view
    Market(MarketArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = GlobalOpts::new(cli.config, &cli.format)?;

    match cli.command {
        Commands::Scan(args) => commands::run_scan(&opts, args).await?,
        Commands::Arbitrage(args) => commands::run_arbitrage(&opts, args).await?,
        Commands::Value(args) => commands::run_value(&opts, args).await?,
        Commands::Movement(args) => commands::run_movement(&opts, args).await?,
        Commands::Market(args) => commands::run_market(&opts, args).await?,
    }

    Ok(())
}
