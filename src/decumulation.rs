//! Constant purchasing-power decumulation
//!
//! Money is withdrawn at the start of each month and the remainder then grows
//! for the month. Each withdrawal is the previous one grown by monthly
//! inflation, so the real amount stays level until the balance reaches zero.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};
use crate::rates::{annual_to_monthly, MONTHS_PER_YEAR};

/// Month-by-month decumulation trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecumulationSchedule {
    /// Balance after each month's withdrawal and growth, index 0 is the start balance
    pub balances: Vec<f64>,
    /// Amount withdrawn at the start of each month
    pub withdrawals: Vec<f64>,
}

impl DecumulationSchedule {
    pub fn final_balance(&self) -> f64 {
        self.balances.last().copied().unwrap_or(0.0)
    }
}

/// First month's withdrawal that exhausts `start_balance` after `years_to_consume` years
///
/// ```text
/// W = K0 · r^K / Σ_{i=1..K} (f^(K−i) · r^i)
/// ```
/// with `K` months, `r` the monthly return factor and `f` the monthly inflation factor.
pub fn monthly_purchasing_power(
    start_balance: f64,
    years_to_consume: u32,
    annual_rate_of_return: f64,
    annual_rate_of_inflation: f64,
) -> ProjectionResult<f64> {
    if years_to_consume == 0 {
        return Err(ProjectionError::invalid_input(
            "years_to_consume must be > 0",
        ));
    }

    let monthly_inflation = annual_to_monthly(annual_rate_of_inflation);
    let monthly_rate = annual_to_monthly(annual_rate_of_return);
    let months = years_to_consume * MONTHS_PER_YEAR;

    let weighted_sum: f64 = (1..=months)
        .map(|i| monthly_inflation.powf((months - i) as f64) * monthly_rate.powf(i as f64))
        .sum();

    let withdrawal = start_balance * monthly_rate.powf(months as f64) / weighted_sum;
    debug!(
        "Purchasing power over {} months: first withdrawal {:.2} from {:.2}",
        months, withdrawal, start_balance
    );
    Ok(withdrawal)
}

/// Run the withdraw-then-grow sequence for `years_to_consume` years
///
/// With the withdrawal from [`monthly_purchasing_power`] the final balance is zero.
pub fn simulate_withdrawals(
    start_balance: f64,
    years_to_consume: u32,
    annual_rate_of_return: f64,
    annual_rate_of_inflation: f64,
    first_withdrawal: f64,
) -> DecumulationSchedule {
    let monthly_inflation = annual_to_monthly(annual_rate_of_inflation);
    let monthly_rate = annual_to_monthly(annual_rate_of_return);
    let months = (years_to_consume * MONTHS_PER_YEAR) as usize;

    let mut balances = Vec::with_capacity(months + 1);
    let mut withdrawals = Vec::with_capacity(months);
    let mut balance = start_balance;
    let mut withdrawal = first_withdrawal;
    balances.push(balance);

    for month in 0..months {
        if month > 0 {
            // keep purchasing power level
            withdrawal *= monthly_inflation;
        }
        balance -= withdrawal;
        balance *= monthly_rate;
        withdrawals.push(withdrawal);
        balances.push(balance);
    }

    DecumulationSchedule {
        balances,
        withdrawals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_balance_reaches_zero() {
        for s in 1..5 {
            let sb = s as f64 * 1e6;
            for y in [1, 10, 29] {
                for r in 0..10 {
                    let rate = r as f64 / 100.0;
                    for i in 1..5 {
                        let inflation = i as f64 / 100.0;
                        let mpp = monthly_purchasing_power(sb, y, rate, inflation).unwrap();
                        let schedule = simulate_withdrawals(sb, y, rate, inflation, mpp);
                        assert!(
                            schedule.final_balance().abs() < 1e-6,
                            "Residual balance {} for sb={} y={} r={} i={}",
                            schedule.final_balance(), sb, y, rate, inflation
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_rates_split_evenly() {
        // no growth and no inflation: equal slices
        let mpp = monthly_purchasing_power(12_000.0, 1, 0.0, 0.0).unwrap();
        assert_abs_diff_eq!(mpp, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_withdrawals_grow_with_inflation() {
        let mpp = monthly_purchasing_power(500_000.0, 20, 0.05, 0.03).unwrap();
        let schedule = simulate_withdrawals(500_000.0, 20, 0.05, 0.03, mpp);
        assert_eq!(schedule.withdrawals.len(), 240);
        assert_eq!(schedule.balances.len(), 241);
        // twelve months of inflation raises the withdrawal by the annual rate
        assert_abs_diff_eq!(schedule.withdrawals[12] / schedule.withdrawals[0], 1.03, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert!(monthly_purchasing_power(1000.0, 0, 0.05, 0.02).is_err());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_computed_withdrawal_exhausts_balance(
            start in 1e5f64..4e6,
            years in 1u32..30,
            rate in 0.0f64..0.09,
            inflation in 0.01f64..0.04
        ) {
            let mpp = monthly_purchasing_power(start, years, rate, inflation).unwrap();
            let schedule = simulate_withdrawals(start, years, rate, inflation, mpp);
            prop_assert!(schedule.final_balance().abs() < 1e-6,
                "residual {}", schedule.final_balance());
        }
    }
}
