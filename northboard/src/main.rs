//! northboard - customer analytics dashboard CLI
//!
//! Loads the customer and usage tables, runs the aggregation pipeline once,
//! and renders the dashboard as a terminal report, markdown, or JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use northboard_core::analytics::{compute, DashboardReport, DateRange, DeepDiveParams};
use northboard_core::{ActionCatalog, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "northboard")]
#[command(about = "Customer analytics dashboard for a multi-product subscription business")]
#[command(version)]
struct Args {
    /// Path to the customer records CSV
    #[arg(long)]
    customers: PathBuf,

    /// Path to the usage events CSV
    #[arg(long)]
    usage: PathBuf,

    /// Path to the TOML configuration file
    #[arg(long)]
    config: PathBuf,

    /// Deep-dive product (default: from config)
    #[arg(long)]
    product: Option<String>,

    /// Deep-dive range start, YYYY-MM-DD (default: from config)
    #[arg(long)]
    start: Option<String>,

    /// Deep-dive range end, YYYY-MM-DD (default: from config)
    #[arg(long)]
    end: Option<String>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid --{} date {:?}, expected YYYY-MM-DD", flag, value))
}

fn deep_dive_params(args: &Args, config: &Config) -> Result<DeepDiveParams> {
    let configured = config.deep_dive.as_ref();

    let product = match (&args.product, configured) {
        (Some(product), _) => product.clone(),
        (None, Some(deep_dive)) => deep_dive.product.clone(),
        (None, None) => anyhow::bail!(
            "no deep-dive product: pass --product or add a [deep_dive] section to the config"
        ),
    };

    let start = match (&args.start, configured) {
        (Some(value), _) => parse_date(value, "start")?,
        (None, Some(deep_dive)) => deep_dive.start_date,
        (None, None) => anyhow::bail!("no deep-dive range: pass --start/--end or configure one"),
    };
    let end = match (&args.end, configured) {
        (Some(value), _) => parse_date(value, "end")?,
        (None, Some(deep_dive)) => deep_dive.end_date,
        (None, None) => anyhow::bail!("no deep-dive range: pass --start/--end or configure one"),
    };

    let range = DateRange::new(start, end).context("invalid deep-dive range")?;
    Ok(DeepDiveParams::new(product, range))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load_from(&args.config).context("failed to load configuration")?;
    northboard_core::logging::init(&config.logging);

    let catalog = ActionCatalog::from_config(&config).context("failed to build action catalog")?;
    let records = northboard_core::ingest::load_customers(&args.customers)
        .context("failed to load customer records")?;
    let events =
        northboard_core::ingest::load_usage(&args.usage).context("failed to load usage events")?;

    let params = deep_dive_params(&args, &config)?;
    let report = compute(&records, &events, &catalog, &params);

    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some("md") => print_markdown(&report, &catalog),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&report, &catalog),
    }

    Ok(())
}

fn print_terminal(report: &DashboardReport, catalog: &ActionCatalog) {
    println!();
    println!("╭{}╮", "─".repeat(72));
    println!("│{:^72}│", "CUSTOMER ANALYTICS OVERVIEW");
    println!("╰{}╯", "─".repeat(72));
    println!();

    println!(
        "{:<12} {:>10} {:>8} {:>7} {:>12}",
        "Product", "Activated", "Active", "Churn", "North Star"
    );
    for row in &report.summary {
        println!(
            "{:<12} {:>10} {:>8} {:>6.2}% {:>12}",
            row.product,
            row.lifetime_activated,
            row.current_active,
            row.churn_rate_pct,
            row.north_star_value
        );
        let description = catalog.description(&row.product);
        if !description.is_empty() {
            println!("{:<12} {}", "", description);
        }
    }
    println!();

    let deep_dive = &report.deep_dive;
    println!(
        "DEEP DIVE: {} ({} to {})",
        deep_dive.product, deep_dive.range.start, deep_dive.range.end
    );
    println!();

    if let (Some(first), Some(last)) = (deep_dive.series.first(), deep_dive.series.last()) {
        let peak = deep_dive.series.iter().map(|p| p.active).max().unwrap_or(0);
        println!("   Cumulative activated: {}", last.cumulative_activated);
        println!("   Cumulative cancelled: {}", last.cumulative_cancelled);
        println!(
            "   Active customers:     {} -> {} (peak {})",
            first.active, last.active, peak
        );
        println!();
    }

    if !deep_dive.funnel.is_empty() {
        println!("ACTION FUNNEL");
        for row in &deep_dive.funnel {
            println!("   {:<24} {:>8}", row.label, row.usage_count);
        }
        println!();
    }

    if !deep_dive.cohorts.action_mix.is_empty() {
        println!("CHURNED VS RETAINED ACTION MIX");
        println!("   {:<24} {:>9} {:>9}", "Action", "Churned", "Retained");
        for row in &deep_dive.cohorts.action_mix {
            println!(
                "   {:<24} {:>8.1}% {:>8.1}%",
                row.label, row.churned_pct, row.retained_pct
            );
        }
        println!();
    }

    if !deep_dive.cohorts.channel_churn.is_empty() {
        println!("CHURN BY CHANNEL");
        for row in &deep_dive.cohorts.channel_churn {
            println!(
                "   {:<16} {:>4} churned of {:>4} activated ({:.1}%)",
                row.channel, row.churned, row.lifetime_activated, row.churn_rate_pct
            );
        }
        println!();
    }

    if !deep_dive.cohorts.channel_breakdown.is_empty() {
        println!("CUSTOMERS BY CHANNEL");
        for row in &deep_dive.cohorts.channel_breakdown {
            println!("   {:<16} {:>6}", row.channel, row.customer_count);
        }
        println!();
    }
}

fn print_markdown(report: &DashboardReport, catalog: &ActionCatalog) {
    println!("# Customer Analytics Overview");
    println!();
    println!("| Product | Lifetime Activated | Current Active | Churn Rate | North Star |");
    println!("|---------|--------------------|----------------|------------|------------|");
    for row in &report.summary {
        println!(
            "| {} | {} | {} | {:.2}% | {} |",
            row.product,
            row.lifetime_activated,
            row.current_active,
            row.churn_rate_pct,
            row.north_star_value
        );
    }
    println!();

    for row in &report.summary {
        let description = catalog.description(&row.product);
        if !description.is_empty() {
            println!("- **{}:** {}", row.product, description);
        }
    }
    println!();

    let deep_dive = &report.deep_dive;
    println!(
        "## Deep Dive: {} ({} to {})",
        deep_dive.product, deep_dive.range.start, deep_dive.range.end
    );
    println!();

    if let Some(last) = deep_dive.series.last() {
        println!("- **Cumulative activated:** {}", last.cumulative_activated);
        println!("- **Cumulative cancelled:** {}", last.cumulative_cancelled);
        println!("- **Active at range end:** {}", last.active);
        println!();
    }

    if !deep_dive.funnel.is_empty() {
        println!("### Action Funnel");
        println!();
        println!("| Action | Usage |");
        println!("|--------|-------|");
        for row in &deep_dive.funnel {
            println!("| {} | {} |", row.label, row.usage_count);
        }
        println!();
    }

    if !deep_dive.cohorts.action_mix.is_empty() {
        println!("### Churned vs Retained Action Mix");
        println!();
        println!("| Action | Churned | Retained |");
        println!("|--------|---------|----------|");
        for row in &deep_dive.cohorts.action_mix {
            println!(
                "| {} | {:.1}% | {:.1}% |",
                row.label, row.churned_pct, row.retained_pct
            );
        }
        println!();
    }

    if !deep_dive.cohorts.channel_churn.is_empty() {
        println!("### Churn by Channel");
        println!();
        println!("| Channel | Activated | Churned | Churn Rate |");
        println!("|---------|-----------|---------|------------|");
        for row in &deep_dive.cohorts.channel_churn {
            println!(
                "| {} | {} | {} | {:.1}% |",
                row.channel, row.lifetime_activated, row.churned, row.churn_rate_pct
            );
        }
        println!();
    }

    println!("---");
    println!("*Generated by northboard*");
}

fn print_json(report: &DashboardReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
