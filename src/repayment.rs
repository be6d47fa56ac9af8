//! Loan repayment simulation
//!
//! Each installment period interest accrues on the owed balance and the
//! installment net of that interest pays down principal. The simulation runs
//! year by year until the owed balance turns negative.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};
use crate::rates::{annual_to_periodic, MONTHS_PER_YEAR};

/// Years simulated before giving up on payoff
pub const MAX_REPAYMENT_YEARS: u32 = 5_000;

/// Payoff schedule of a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    /// Installments paid until the owed balance dropped below zero
    pub installments: u64,
    /// Elapsed time in months
    pub months: f64,
    /// Owed balance after each installment, index 0 is the initial loan balance
    pub balances: Vec<f64>,
}

impl RepaymentSchedule {
    /// Owed balance after the last installment (negative once paid off)
    pub fn final_balance(&self) -> f64 {
        self.balances.last().copied().unwrap_or(0.0)
    }

    /// Elapsed time as whole years and remaining months
    pub fn years_and_months(&self) -> (u32, f64) {
        let years = (self.months / MONTHS_PER_YEAR as f64).floor();
        (years as u32, self.months - years * MONTHS_PER_YEAR as f64)
    }
}

/// Simulate repaying `loan_balance` with a fixed `installment`
///
/// Fails with [`ProjectionError::InfeasibleRepayment`] before simulating when
/// a year of installments does not cover a year of interest, and with
/// [`ProjectionError::NonConvergence`] if the balance has not crossed zero
/// after [`MAX_REPAYMENT_YEARS`].
pub fn rep(
    loan_balance: f64,
    annual_rate: f64,
    installment: f64,
    installments_per_year: u32,
) -> ProjectionResult<RepaymentSchedule> {
    simulate_repayment(
        loan_balance,
        annual_rate,
        installment,
        installments_per_year,
        MAX_REPAYMENT_YEARS,
    )
}

/// [`rep`] with an explicit cap on simulated years
pub(crate) fn simulate_repayment(
    loan_balance: f64,
    annual_rate: f64,
    installment: f64,
    installments_per_year: u32,
    max_years: u32,
) -> ProjectionResult<RepaymentSchedule> {
    if installments_per_year == 0 {
        return Err(ProjectionError::invalid_input(
            "installments_per_year must be > 0",
        ));
    }
    if !(loan_balance.is_finite() && annual_rate.is_finite() && installment.is_finite()) {
        return Err(ProjectionError::invalid_input(
            "loan_balance, annual_rate and installment must be finite",
        ));
    }
    if installment * (installments_per_year as f64) < loan_balance * annual_rate {
        return Err(ProjectionError::InfeasibleRepayment {
            installment,
            installments_per_year,
            loan_balance,
            annual_rate,
        });
    }

    let period_rate = annual_to_periodic(annual_rate, installments_per_year) - 1.0;

    let mut owed = loan_balance;
    let mut balances = vec![owed];
    let mut installments: u64 = 0;

    for _year in 0..max_years {
        for _period in 0..installments_per_year {
            let interest = owed * period_rate;
            owed -= installment - interest;
            installments += 1;
            balances.push(owed);

            if owed < 0.0 {
                let months = installments as f64 / (installments_per_year as f64)
                    * (MONTHS_PER_YEAR as f64);
                debug!(
                    "Loan of {:.2} repaid after {} installments ({:.1} months), overpaid {:.2}",
                    loan_balance, installments, months, -owed
                );
                return Ok(RepaymentSchedule {
                    installments,
                    months,
                    balances,
                });
            }
        }
    }

    Err(ProjectionError::NonConvergence {
        installments,
        max_years,
    })
}
