//! Generate the savings/retirement table
//!
//! Sweeps contributions, start balances, rates and horizons and writes one CSV
//! row per cell. Every "today" value discounts a future value by inflation
//! over the growth years.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use clap::Parser;
use log::info;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;
use wealth_projection::{run_sweep, value_today, SweepConfig};

#[derive(Parser)]
#[command(name = "etf_table", about = "Savings and purchasing-power table")]
struct Args {
    /// JSON file overriding the default grids
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "etf.csv")]
    output: PathBuf,

    /// Annual inflation rate (overrides the config)
    #[arg(long)]
    inflation: Option<f64>,
}

/// Table preamble line, stamped with the zone offset of `generated`
fn generation_header<Tz>(generated: &DateTime<Tz>, inflation: f64) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Generated on {} (local time, UTC{}) with annual inflation {}",
        generated.format("%a %b %e %H:%M:%S %Y"),
        generated.format("%:z"),
        inflation
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let mut config = match &args.config {
        Some(path) => SweepConfig::from_json_path(path)?,
        None => SweepConfig::default(),
    };
    if let Some(inflation) = args.inflation {
        config.inflation = inflation;
    }

    info!("{}", generation_header(&Local::now(), config.inflation));
    info!(
        "With {} inflation, 100 in 30 years corresponds to {:.2} today",
        config.inflation,
        value_today(100.0, 30, config.inflation)
    );
    info!(
        "Net values are after subtracting {} x {} tax",
        config.gains_tax.rate, config.gains_tax.surcharge
    );

    let rows = run_sweep(&config)?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!(
        "Generated {} ({} rows in {:?})",
        args.output.display(),
        rows.len(),
        start.elapsed()
    );
    Ok(())
}
