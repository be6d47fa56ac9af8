//! Compound growth of a balance with periodic contributions
//!
//! Each period the balance grows by the per-period factor and then the
//! contribution is added. The closed form and the simulation both use this
//! ordering and must agree.

use serde::{Deserialize, Serialize};

use crate::rates::annual_to_periodic;

/// Per-period growth factors closer to 1 than this are treated as no growth
const UNIT_GROWTH_TOLERANCE: f64 = 1e-14;

/// Number of growth steps per year; `0` is the legacy one-step-per-year mode
pub(crate) fn steps_per_year(periods_per_year: u32) -> u32 {
    periods_per_year.max(1)
}

/// Period-by-period growth result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSchedule {
    /// Balance after the last period
    pub final_balance: f64,
    /// Balance after each period, index 0 is the start balance
    pub balances: Vec<f64>,
}

/// Final balance by closed form
///
/// `K0·R^N + m·(1 − R^N)/(1 − R^(1/P))` with `R = 1 + annual_rate`.
/// When the per-period factor is 1 the sum degenerates to `K0·R^N + m·P·N`.
///
/// Precondition: `1 + annual_rate >= 0`.
pub fn compound_interest(
    start: f64,
    annual_rate: f64,
    contribution: f64,
    periods_per_year: u32,
    years: u32,
) -> f64 {
    let steps = steps_per_year(periods_per_year);
    let period_factor = annual_to_periodic(annual_rate, periods_per_year);
    let total_growth = (1.0 + annual_rate).powi(years as i32);

    if (period_factor - 1.0).abs() < UNIT_GROWTH_TOLERANCE {
        let periods = (steps as u64 * years as u64) as f64;
        return start * total_growth + contribution * periods;
    }

    start * total_growth + contribution * (1.0 - total_growth) / (1.0 - period_factor)
}

/// Final balance and schedule by explicit simulation
pub fn simulate_compound_interest(
    start: f64,
    annual_rate: f64,
    contribution: f64,
    periods_per_year: u32,
    years: u32,
) -> GrowthSchedule {
    let steps = steps_per_year(periods_per_year) as usize * years as usize;
    let period_factor = annual_to_periodic(annual_rate, periods_per_year);

    let mut balances = Vec::with_capacity(steps + 1);
    let mut balance = start;
    balances.push(balance);

    for _ in 0..steps {
        // grow until the next contribution, then contribute
        balance *= period_factor;
        balance += contribution;
        balances.push(balance);
    }

    GrowthSchedule {
        final_balance: balance,
        balances,
    }
}
