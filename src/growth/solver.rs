//! Implied interest rate from known start and end balances
//!
//! With `S` the per-period growth factor and `n = years · periods_per_year`,
//! the compound growth formula rearranges to
//!
//! ```text
//! (m − F) + F·S + (K0 − m)·S^n − K0·S^(n+1) = 0
//! ```
//!
//! The solver first tries every exact root of this polynomial, then falls back
//! to a bracketed search on the same polynomial with its trivial root at
//! `S = 1` divided out.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::compound::{compound_interest, steps_per_year};
use super::polynomial::{bracketed_root, BracketSearch, Polynomial};
use crate::error::{ProjectionError, ProjectionResult};

/// Candidates whose growth factor has a larger imaginary part are discarded
pub const IMAGINARY_TOLERANCE: f64 = 1e-10;

/// A recovered rate is accepted when it reproduces the final balance this closely
pub const RESIDUAL_TOLERANCE: f64 = 1e-2;

/// Highest annual rate the fallback search will consider (1000%)
const FALLBACK_MAX_ANNUAL_RATE: f64 = 10.0;

/// Implied-rate result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSolution {
    /// Annual rate as a fraction
    pub rate: f64,
    /// `|target final balance − final balance at rate|`
    pub residual_error: f64,
    /// True when no exact polynomial root met [`RESIDUAL_TOLERANCE`]
    pub used_fallback: bool,
}

impl RateSolution {
    /// Whether the residual is within the acceptance tolerance
    pub fn is_confident(&self) -> bool {
        self.residual_error < RESIDUAL_TOLERANCE
    }
}

/// Growth polynomial in the per-period factor for `periods` total periods
pub fn growth_polynomial(
    start: f64,
    final_balance: f64,
    contribution: f64,
    periods: usize,
) -> Polynomial {
    let mut coefficients = vec![0.0; periods + 2];
    // accumulate: with a single period the middle terms share an index
    coefficients[0] += contribution - final_balance;
    coefficients[1] += final_balance;
    coefficients[periods] += start - contribution;
    coefficients[periods + 1] -= start;
    Polynomial::new(coefficients)
}

/// Annual rate that grows `start` with `contribution` per period into `final_balance`
///
/// Always returns a best candidate for valid durations. Check
/// [`RateSolution::used_fallback`] and the residual to judge the fit.
pub fn compound_interest_rate(
    start: f64,
    final_balance: f64,
    contribution: f64,
    periods_per_year: u32,
    years: u32,
) -> ProjectionResult<RateSolution> {
    if years == 0 {
        return Err(ProjectionError::invalid_input(
            "years must be > 0 to recover a rate",
        ));
    }

    let steps = steps_per_year(periods_per_year);
    let periods = steps as usize * years as usize;
    let polynomial = growth_polynomial(start, final_balance, contribution, periods);

    let residual_at = |rate: f64| {
        (final_balance - compound_interest(start, rate, contribution, periods_per_year, years)).abs()
    };

    if let Some(solution) = solve_from_exact_roots(&polynomial, steps, &residual_at) {
        return Ok(solution);
    }

    let (deflated, remainder) = polynomial.deflate(1.0);
    warn!(
        "No exact root within tolerance; falling back to bracketed search (deflation remainder {:.3e})",
        remainder
    );

    let search = BracketSearch {
        upper_limit: (1.0 + FALLBACK_MAX_ANNUAL_RATE).powf(1.0 / steps as f64),
        ..BracketSearch::default()
    };
    let period_factor = bracketed_root(|s| deflated.evaluate(s), 1.0, &search);
    let rate = period_factor.powi(steps as i32) - 1.0;
    let residual_error = residual_at(rate);

    if residual_error >= RESIDUAL_TOLERANCE {
        warn!(
            "Implied rate {:.6} leaves residual {:.4} above tolerance {}",
            rate, residual_error, RESIDUAL_TOLERANCE
        );
    }

    Ok(RateSolution {
        rate,
        residual_error,
        used_fallback: true,
    })
}

/// First exact root, largest growth factor first, that reproduces the balance
fn solve_from_exact_roots<F>(polynomial: &Polynomial, steps: u32, residual_at: &F) -> Option<RateSolution>
where
    F: Fn(f64) -> f64,
{
    let Some(roots) = polynomial.roots() else {
        debug!(
            "Eigenvalue iteration did not converge for degree {} polynomial",
            polynomial.degree()
        );
        return None;
    };

    let mut growth_factors: Vec<f64> = roots
        .iter()
        .map(|root| root.powu(steps))
        .filter(|g| g.im.abs() < IMAGINARY_TOLERANCE && g.re > 1.0)
        .map(|g| g.re)
        .collect();
    growth_factors.sort_by(|a, b| b.total_cmp(a));

    debug!(
        "{} of {} roots give real growth factors above 1",
        growth_factors.len(),
        roots.len()
    );

    growth_factors.into_iter().find_map(|growth| {
        let rate = growth - 1.0;
        let residual_error = residual_at(rate);
        (residual_error < RESIDUAL_TOLERANCE).then_some(RateSolution {
            rate,
            residual_error,
            used_fallback: false,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_polynomial_coefficients() {
        let p = growth_polynomial(5000.0, 12000.0, 100.0, 4);
        assert_eq!(p.coefficients(), &[-11900.0, 12000.0, 0.0, 0.0, 4900.0, -5000.0]);
    }

    #[test]
    fn test_polynomial_single_period_shares_index() {
        let p = growth_polynomial(1000.0, 1200.0, 100.0, 1);
        assert_eq!(p.coefficients(), &[-1100.0, 2100.0, -1000.0]);
    }

    #[test]
    fn test_polynomial_has_trivial_unit_root() {
        let p = growth_polynomial(5000.0, 12254.47, 100.0, 60);
        assert_abs_diff_eq!(p.evaluate(1.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_polynomial_vanishes_at_true_factor() {
        let fb = compound_interest(5000.0, 0.03, 100.0, 12, 5);
        let p = growth_polynomial(5000.0, fb, 100.0, 60);
        let s = 1.03_f64.powf(1.0 / 12.0);
        assert!(p.evaluate(s).abs() < 1e-6, "p(S) = {}", p.evaluate(s));
    }

    #[test]
    fn test_recovers_known_rate() {
        let fb = compound_interest(5000.0, 0.03, 100.0, 12, 5);
        let solution = compound_interest_rate(5000.0, fb, 100.0, 12, 5).unwrap();
        assert_abs_diff_eq!(solution.rate, 0.03, epsilon = 1e-5);
        assert!(solution.is_confident(), "residual {}", solution.residual_error);
    }

    #[test]
    fn test_recovers_annual_rate_without_contribution() {
        // 1000 -> 1100 in one year
        let solution = compound_interest_rate(1000.0, 1100.0, 0.0, 1, 1).unwrap();
        assert_abs_diff_eq!(solution.rate, 0.10, epsilon = 1e-9);
        assert!(!solution.used_fallback);
    }

    #[test]
    fn test_negative_rate_falls_back() {
        // balance shrinks: no exact root above 1 can match
        let fb = compound_interest(10000.0, -0.02, 0.0, 12, 3);
        let solution = compound_interest_rate(10000.0, fb, 0.0, 12, 3).unwrap();
        assert!(solution.used_fallback);
        assert_abs_diff_eq!(solution.rate, -0.02, epsilon = 1e-6);
        assert!(solution.is_confident());
    }

    #[test]
    fn test_zero_rate_recovered() {
        // S = 1 is a double root here, so either phase may produce the answer
        let solution = compound_interest_rate(1000.0, 1000.0 + 12.0 * 50.0, 50.0, 12, 1).unwrap();
        assert_abs_diff_eq!(solution.rate, 0.0, epsilon = 1e-6);
        assert!(solution.is_confident());
    }

    #[test]
    fn test_unreachable_target_reports_residual() {
        // contributions alone exceed the target even at the most negative rates searched
        let solution = compound_interest_rate(0.0, 10.0, 1000.0, 12, 1).unwrap();
        assert!(solution.used_fallback);
        assert!(solution.rate.is_finite());
        assert!(!solution.is_confident(), "residual {}", solution.residual_error);
    }

    #[test]
    fn test_zero_years_rejected() {
        let err = compound_interest_rate(1000.0, 1100.0, 0.0, 12, 0).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { .. }));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(16))]

        #[test]
        fn prop_recovers_rate_used_to_build_balance(
            start in 1_000.0f64..200_000.0,
            rate in 0.01f64..0.12,
            contribution in 0.0f64..2_000.0,
            periods_per_year in prop::sample::select(vec![1u32, 4, 12]),
            years in 1u32..15
        ) {
            let fb = compound_interest(start, rate, contribution, periods_per_year, years);
            let solution = compound_interest_rate(start, fb, contribution, periods_per_year, years).unwrap();
            prop_assert!((solution.rate - rate).abs() < 1e-5,
                "recovered {} expected {} (fallback {})", solution.rate, rate, solution.used_fallback);
        }
    }
}
