//! Wealth Projection - numeric engine for personal-finance projections
//!
//! This library provides:
//! - Annual to per-period rate conversion and present values
//! - Compound growth of periodic contributions (closed form and simulation)
//! - Constant purchasing-power decumulation
//! - Implied interest rate recovery from start/end balances
//! - Loan repayment schedules
//! - Parameter sweeps for savings/retirement tables

pub mod error;
pub mod rates;
pub mod growth;
pub mod decumulation;
pub mod repayment;
pub mod sweep;

// Re-export commonly used types
pub use error::{ProjectionError, ProjectionResult};
pub use rates::{annual_to_monthly, annual_to_periodic, subtract_gains_tax, value_today, GainsTax};
pub use growth::{
    compound_interest, compound_interest_rate, simulate_compound_interest, GrowthSchedule,
    RateSolution,
};
pub use decumulation::{monthly_purchasing_power, simulate_withdrawals, DecumulationSchedule};
pub use repayment::{rep, RepaymentSchedule};
pub use sweep::{run_sweep, SweepConfig, SweepRow};
