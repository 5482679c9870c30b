//! Capital Planner CLI
//!
//! Command-line interface for sizing the capital behind a scenario document

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use capital_planner::{load_scenario, process_scenario, ItemResult, PlanOutcome};
use clap::Parser;

/// Compute the capital required today to fund a household lifestyle plan
#[derive(Parser, Debug)]
#[command(name = "capital_planner", version)]
struct Cli {
    /// Path to the scenario JSON document
    scenario: PathBuf,

    /// Write every item's projection rows to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full outcome as JSON instead of the report
    #[arg(long)]
    json: bool,

    /// Projection rows printed per item
    #[arg(long, default_value_t = 10)]
    preview_rows: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let scenario = load_scenario(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;
    log::info!(
        "scenario loaded: {} incomes, {} cars, {} assets, {} travel",
        scenario.incomes.len(),
        scenario.cars.len(),
        scenario.assets.len(),
        scenario.travel.len()
    );

    let start = Instant::now();
    let outcome = process_scenario(&scenario);
    log::info!("scenario evaluated in {:?}", start.elapsed());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Capital Planner v{}", env!("CARGO_PKG_VERSION"));
        println!("=======================\n");

        for item in &outcome.items {
            print_item(item, cli.preview_rows);
        }

        println!(
            "Total capital required today: ${:.2}",
            outcome.total_capital
        );
    }

    if let Some(path) = &cli.csv {
        write_csv(path, &outcome)
            .with_context(|| format!("writing projection rows to {}", path.display()))?;
        println!("Projection rows written to: {}", path.display());
    }

    Ok(())
}

fn print_item(item: &ItemResult, preview_rows: usize) {
    println!("{}", item.title);
    println!(
        "  Portfolio: {} (income {:.2}%, growth {:.2}%, tax {:.2}%, fees {:.2}%)",
        item.rates.portfolio.as_str(),
        item.rates.income_return,
        item.rates.growth_return,
        item.rates.tax_rate,
        item.rates.fee_load
    );
    println!("  Fund age: {}", item.fund_age);
    println!("  Capital at fund age: ${:.2}", item.capital_at_fund_age);
    println!("  Capital required today: ${:.2}", item.present_value_capital);

    println!(
        "  {:>5} {:>4} {:>4} {:>14} {:>12} {:>10} {:>12} {:>14}",
        "Year", "P1", "P2", "Opening", "Drawdown", "Fees", "Growth", "Closing"
    );
    for row in item.rows.iter().take(preview_rows) {
        println!(
            "  {:>5} {:>4} {:>4} {:>14.2} {:>12.2} {:>10.2} {:>12.2} {:>14.2}",
            row.year,
            row.p1_age.map_or_else(|| "-".to_string(), |a| a.to_string()),
            row.p2_age.map_or_else(|| "-".to_string(), |a| a.to_string()),
            row.opening_balance,
            row.drawdown,
            row.fees,
            row.growth,
            row.closing_balance,
        );
    }
    if item.rows.len() > preview_rows {
        println!("  ... ({} more years)", item.rows.len() - preview_rows);
    }
    println!();
}

fn write_csv(path: &Path, outcome: &PlanOutcome) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Item",
        "Year",
        "P1 Age",
        "P2 Age",
        "Opening Balance",
        "Income Return",
        "Tax",
        "Income Net",
        "Growth",
        "Fees",
        "Drawdown",
        "Closing Balance",
    ])?;

    for item in &outcome.items {
        for row in &item.rows {
            writer.write_record([
                item.title.clone(),
                row.year.to_string(),
                row.p1_age.map_or_else(String::new, |a| a.to_string()),
                row.p2_age.map_or_else(String::new, |a| a.to_string()),
                format!("{:.2}", row.opening_balance),
                format!("{:.2}", row.income_return),
                format!("{:.2}", row.tax),
                format!("{:.2}", row.income_net),
                format!("{:.2}", row.growth),
                format!("{:.2}", row.fees),
                format!("{:.2}", row.drawdown),
                format!("{:.2}", row.closing_balance),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
