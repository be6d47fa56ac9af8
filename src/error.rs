//! Error types for projection calculations

use thiserror::Error;

/// Result type used across the projection engines
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors raised by the projection engines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The installment never covers the first year's interest
    #[error(
        "Infeasible repayment: {installment} x {installments_per_year} per year does not cover \
         interest of {annual_rate} on {loan_balance}"
    )]
    InfeasibleRepayment {
        installment: f64,
        installments_per_year: u32,
        loan_balance: f64,
        annual_rate: f64,
    },

    /// Repayment loop hit its iteration cap without the balance crossing zero
    #[error("Repayment did not converge after {installments} installments ({max_years} years)")]
    NonConvergence { installments: u64, max_years: u32 },

    /// Input outside the domain of the calculation
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Sweep configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProjectionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
