//! Parameter sweeps feeding the savings/retirement tables
//!
//! A sweep grows every start balance with every contribution level, then
//! decumulates the end balance over each horizon. Grids are plain
//! configuration data and cells are evaluated in parallel.

use std::fs::File;
use std::path::Path;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::decumulation::monthly_purchasing_power;
use crate::error::{ProjectionError, ProjectionResult};
use crate::growth::compound_interest;
use crate::rates::{annual_to_monthly, value_today, GainsTax};

/// Grids and assumptions for a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Years over which the end balance is consumed
    pub consume_years: Vec<u32>,
    /// Contribution per period during the growth years
    pub contributions: Vec<f64>,
    pub contributions_per_year: u32,
    /// Years of growth before consumption starts
    pub growth_years: Vec<u32>,
    /// Annual inflation used for purchasing power and "today" values
    pub inflation: f64,
    /// Annual rates of return
    pub rates: Vec<f64>,
    pub start_balances: Vec<f64>,
    pub gains_tax: GainsTax,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            consume_years: vec![20, 30, 40],
            contributions: (0..=6).map(|i| i as f64 * 500.0).collect(),
            contributions_per_year: 12,
            growth_years: vec![10, 20, 30],
            inflation: 0.03,
            rates: vec![0.05, 0.06, 0.07],
            start_balances: (0..10).map(|i| i as f64 * 50_000.0).collect(),
            gains_tax: GainsTax::default(),
        }
    }
}

impl SweepConfig {
    /// Load a config from JSON; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> ProjectionResult<Self> {
        let file = File::open(path)
            .map_err(|e| ProjectionError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_reader(file)
            .map_err(|e| ProjectionError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Number of cells the sweep evaluates
    pub fn cell_count(&self) -> usize {
        self.contributions.len()
            * self.start_balances.len()
            * self.rates.len()
            * self.growth_years.len()
            * self.consume_years.len()
    }

    /// Grid cells in output order: contribution, start balance, rate, growth years, consume years
    fn cells(&self) -> Vec<SweepCell> {
        let mut cells = Vec::with_capacity(self.cell_count());
        for &contribution in &self.contributions {
            for &start_balance in &self.start_balances {
                for &rate in &self.rates {
                    for &growth_years in &self.growth_years {
                        for &consume_years in &self.consume_years {
                            cells.push(SweepCell {
                                contribution,
                                start_balance,
                                rate,
                                growth_years,
                                consume_years,
                            });
                        }
                    }
                }
            }
        }
        cells
    }
}

#[derive(Debug, Clone, Copy)]
struct SweepCell {
    contribution: f64,
    start_balance: f64,
    rate: f64,
    growth_years: u32,
    consume_years: u32,
}

/// One evaluated grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub contribution: f64,
    pub start_balance: f64,
    pub rate: f64,
    pub growth_years: u32,
    /// Balance at the end of the growth years
    pub end_balance: f64,
    /// One month of interest on the end balance after tax, in today's money
    pub net_interest_today: f64,
    pub consume_years: u32,
    /// First month's purchasing power after tax
    pub net_mpp: f64,
    /// `net_mpp` in today's money
    pub net_mpp_today: f64,
}

/// Evaluate every cell of the grid
pub fn run_sweep(config: &SweepConfig) -> ProjectionResult<Vec<SweepRow>> {
    let cells = config.cells();
    info!("Running sweep over {} cells", cells.len());

    cells
        .par_iter()
        .map(|cell| evaluate_cell(config, cell))
        .collect()
}

fn evaluate_cell(config: &SweepConfig, cell: &SweepCell) -> ProjectionResult<SweepRow> {
    let end_balance = compound_interest(
        cell.start_balance,
        cell.rate,
        cell.contribution,
        config.contributions_per_year,
        cell.growth_years,
    );

    let monthly_rate = annual_to_monthly(cell.rate) - 1.0;
    let net_interest = config.gains_tax.net(end_balance * monthly_rate);
    let net_interest_today = value_today(net_interest, cell.growth_years, config.inflation);

    let mpp = monthly_purchasing_power(
        end_balance,
        cell.consume_years,
        cell.rate,
        config.inflation,
    )?;
    let net_mpp = config.gains_tax.net(mpp);
    let net_mpp_today = value_today(net_mpp, cell.growth_years, config.inflation);

    Ok(SweepRow {
        contribution: cell.contribution,
        start_balance: cell.start_balance,
        rate: cell.rate,
        growth_years: cell.growth_years,
        end_balance,
        net_interest_today,
        consume_years: cell.consume_years,
        net_mpp,
        net_mpp_today,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    fn small_config() -> SweepConfig {
        SweepConfig {
            consume_years: vec![20, 30],
            contributions: vec![0.0, 500.0],
            contributions_per_year: 12,
            growth_years: vec![10],
            inflation: 0.03,
            rates: vec![0.05],
            start_balances: vec![0.0, 100_000.0],
            gains_tax: GainsTax::default(),
        }
    }

    #[test]
    fn test_default_grid_size() {
        let config = SweepConfig::default();
        assert_eq!(config.contributions, vec![0.0, 500.0, 1000.0, 1500.0, 2000.0, 2500.0, 3000.0]);
        assert_eq!(config.start_balances.len(), 10);
        assert_eq!(config.start_balances[9], 450_000.0);
        assert_eq!(config.cell_count(), 7 * 10 * 3 * 3 * 3);
    }

    #[test]
    fn test_rows_follow_grid_order() {
        let rows = run_sweep(&small_config()).unwrap();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].contribution, 0.0);
        assert_eq!(rows[0].start_balance, 0.0);
        assert_eq!(rows[0].consume_years, 20);
        assert_eq!(rows[1].consume_years, 30);
        assert_eq!(rows[2].start_balance, 100_000.0);
        assert_eq!(rows[4].contribution, 500.0);
    }

    #[test]
    fn test_row_values_match_engines() {
        let config = small_config();
        let rows = run_sweep(&config).unwrap();
        let row = &rows[6]; // 500/month, 100k start, 20 consume years

        let eb = compound_interest(100_000.0, 0.05, 500.0, 12, 10);
        assert_abs_diff_eq!(row.end_balance, eb, epsilon = 1e-9);

        let mpp = monthly_purchasing_power(eb, 20, 0.05, 0.03).unwrap();
        assert_abs_diff_eq!(row.net_mpp, mpp * (1.0 - 0.25 * 1.055), epsilon = 1e-9);
        assert_abs_diff_eq!(row.net_mpp_today, row.net_mpp / 1.03_f64.powi(10), epsilon = 1e-9);
    }

    #[test]
    fn test_empty_balance_gives_zero_income() {
        let rows = run_sweep(&small_config()).unwrap();
        assert_eq!(rows[0].end_balance, 0.0);
        assert_eq!(rows[0].net_mpp, 0.0);
        assert_eq!(rows[0].net_interest_today, 0.0);
    }

    #[test]
    fn test_zero_consume_years_is_an_error() {
        let mut config = small_config();
        config.consume_years = vec![0];
        assert!(run_sweep(&config).is_err());
    }

    #[test]
    fn test_json_overrides_keep_defaults() {
        let path = std::env::temp_dir().join(format!("sweep_config_{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{"inflation": 0.02, "rates": [0.04]}}"#).unwrap();
        drop(file);

        let config = SweepConfig::from_json_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.inflation, 0.02);
        assert_eq!(config.rates, vec![0.04]);
        assert_eq!(config.growth_years, vec![10, 20, 30]);
    }

    #[test]
    fn test_missing_config_file() {
        let err = SweepConfig::from_json_path(Path::new("/nonexistent/sweep.json")).unwrap_err();
        assert!(matches!(err, ProjectionError::Config(_)));
    }
}
