//! Report rendering: aligned text tables or pretty JSON.

use anyhow::{anyhow, Result};
use propline_engine::{
    ArbitrageOpportunity, LineMovement, LineShoppingOpportunity, MarketView,
    OddsShoppingOpportunity, ScanReport,
};
use rust_decimal::Decimal;
use serde::Serialize;

const RULE_WIDTH: usize = 110;

/// Output format for command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: table, json",
                s
            )),
        }
    }
}

/// Prints any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn format_line(line: Option<Decimal>) -> String {
    line.map_or_else(|| "-".to_string(), |l| l.to_string())
}

fn heading(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", title);
    println!("{}", "=".repeat(RULE_WIDTH));
}

// =============================================================================
// Tables
// =============================================================================

pub fn print_summary(report: &ScanReport) {
    let summary = &report.summary;
    let books: Vec<&str> = report.sportsbooks.iter().map(|b| b.as_str()).collect();

    heading("SCAN SUMMARY");
    if let Some(week) = report.week {
        println!("  {:<28}: {}", "Week", week);
    }
    println!("  {:<28}: {}", "Sportsbooks", books.join(", "));
    println!("  {:<28}: {}", "Quotes loaded", summary.quotes_loaded);
    println!("  {:<28}: {}", "Current quotes", summary.current_quotes);
    println!("  {:<28}: {}", "Line groups", summary.line_groups);
    println!("  {:<28}: {}", "Cross-book line groups", summary.cross_book_line_groups);
    println!("  {:<28}: {}", "Cross-book props", summary.cross_book_identity_groups);
    println!("  {:<28}: {}", "Scrape history", if summary.has_history { "yes" } else { "no" });
    println!("  {:<28}: {}", "Arbitrage", summary.arbitrage_found);
    println!("  {:<28}: {}", "Odds shopping", summary.odds_shopping_found);
    println!("  {:<28}: {}", "Line shopping", summary.line_shopping_found);
    println!("  {:<28}: {}", "Line movements", summary.movements_found);
}

pub fn print_arbitrage(opportunities: &[ArbitrageOpportunity]) {
    heading("ARBITRAGE");
    if opportunities.is_empty() {
        println!("  No arbitrage found.");
        return;
    }

    println!(
        "{:<24} {:<30} {:>7} {:<24} {:<24} {:>8}",
        "Player", "Prop", "Line", "Over", "Under", "Margin"
    );
    println!("{}", "-".repeat(RULE_WIDTH));
    for opp in opportunities {
        println!(
            "{:<24} {:<30} {:>7} {:<24} {:<24} {:>8}",
            opp.player,
            opp.prop,
            format_line(opp.line),
            format!("{} {} (${})", opp.over.sportsbook, opp.over.odds_display, opp.over.stake),
            format!("{} {} (${})", opp.under.sportsbook, opp.under.odds_display, opp.under.stake),
            opp.margin_pct,
        );
    }
}

pub fn print_odds_shopping(opportunities: &[OddsShoppingOpportunity]) {
    heading("ODDS SHOPPING");
    if opportunities.is_empty() {
        println!("  No odds-shopping spreads above threshold.");
        return;
    }

    println!(
        "{:<24} {:<30} {:>7} {:<6} {:<20} {:<20} {:>6}",
        "Player", "Prop", "Line", "Side", "Best", "Worst", "Diff"
    );
    println!("{}", "-".repeat(RULE_WIDTH));
    for opp in opportunities {
        println!(
            "{:<24} {:<30} {:>7} {:<6} {:<20} {:<20} {:>6}",
            opp.player,
            opp.prop,
            format_line(opp.line),
            opp.side,
            format!("{} {}", opp.best_book, opp.best_odds_display),
            format!("{} {}", opp.worst_book, opp.worst_odds_display),
            opp.odds_diff,
        );
    }
}

pub fn print_line_shopping(opportunities: &[LineShoppingOpportunity]) {
    heading("LINE SHOPPING");
    if opportunities.is_empty() {
        println!("  No line differences above threshold.");
        return;
    }

    println!(
        "{:<24} {:<30} {:<24} {:<24} {:>6}",
        "Player", "Prop", "Over", "Under", "Diff"
    );
    println!("{}", "-".repeat(RULE_WIDTH));
    for opp in opportunities {
        let over_odds = opp.over_odds_display.as_deref().unwrap_or("-");
        let under_odds = opp.under_odds_display.as_deref().unwrap_or("-");
        println!(
            "{:<24} {:<30} {:<24} {:<24} {:>6}",
            opp.player,
            opp.prop,
            format!("{} {} {}", opp.over_book, opp.over_line, over_odds),
            format!("{} {} {}", opp.under_book, opp.under_line, under_odds),
            opp.line_diff,
        );
    }
}

pub fn print_movements(movements: &[LineMovement]) {
    heading("LINE MOVEMENT");
    if movements.is_empty() {
        println!("  No significant line movement.");
        return;
    }

    println!(
        "{:<24} {:<30} {:<12} {:>7} {:>7} {:>7} {:<12}",
        "Player", "Prop", "Book", "Start", "End", "Change", "Window"
    );
    println!("{}", "-".repeat(RULE_WIDTH));
    for movement in movements {
        let change = if movement.is_up() {
            format!("+{}", movement.change)
        } else {
            movement.change.to_string()
        };
        println!(
            "{:<24} {:<30} {:<12} {:>7} {:>7} {:>7} {:<12}",
            movement.player,
            movement.prop,
            movement.sportsbook,
            movement.start_line,
            movement.end_line,
            change,
            format!(
                "{}-{}",
                movement.start_time.format("%a %H:%M"),
                movement.end_time.format("%a %H:%M")
            ),
        );
    }
}

pub fn print_market(market: &MarketView) {
    heading("MARKET");
    if market.games.is_empty() {
        println!("  No quotes with a known team.");
        return;
    }

    for (game, entry) in &market.games {
        println!();
        println!("{}", game);
        if let Some(line) = &entry.game_line {
            println!(
                "  Moneyline {} / {}   Total {}",
                line.away_moneyline.map_or_else(|| "-".to_string(), |o| o.to_string()),
                line.home_moneyline.map_or_else(|| "-".to_string(), |o| o.to_string()),
                format_line(line.total_line),
            );
        }
        for (team, team_entry) in &entry.teams {
            println!("  {}", team);
            for player in team_entry.players.values() {
                println!("    {}", player.name);
                for (main, qualifiers) in &player.props {
                    for (qualifier, lines) in qualifiers {
                        println!("      {} / {}", main, qualifier);
                        for line in lines {
                            let prices: Vec<String> = line
                                .odds
                                .iter()
                                .map(|(book, odds)| {
                                    format!(
                                        "{} {}/{}",
                                        book,
                                        odds.over_display.as_deref().unwrap_or("-"),
                                        odds.under_display.as_deref().unwrap_or("-"),
                                    )
                                })
                                .collect();
                            println!("        {:>7}   {}", format_line(line.line), prices.join("   "));
                        }
                    }
                }
            }
        }
    }
}
