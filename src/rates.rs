//! Rate conversion and present-value helpers
//!
//! All rates are annual fractions (0.05 = 5%) unless the name says otherwise.
//! Growth factors already include the "+1".

use serde::{Deserialize, Serialize};

/// Months per year, used wherever a monthly schedule is implied
pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual rate to the equivalent monthly growth factor
///
/// Returns `(1 + annual_rate)^(1/12)`. Subtract 1 for a monthly rate.
///
/// Precondition: `1 + annual_rate >= 0`. A negative growth factor yields NaN.
pub fn annual_to_monthly(annual_rate: f64) -> f64 {
    annual_to_periodic(annual_rate, MONTHS_PER_YEAR)
}

/// Convert an annual rate to the growth factor of one of `periods` equal steps per year
///
/// `periods == 0` is the legacy "no sub-annual compounding" mode: one step per
/// year with growth factor `1 + annual_rate`.
pub fn annual_to_periodic(annual_rate: f64, periods: u32) -> f64 {
    let growth = 1.0 + annual_rate;
    match periods {
        0 | 1 => growth,
        p => growth.powf(1.0 / p as f64),
    }
}

/// Discount a future amount back to today's value by inflation only
///
/// `future_value / (1 + annual_inflation)^years`
pub fn value_today(future_value: f64, years: u32, annual_inflation: f64) -> f64 {
    future_value / (1.0 + annual_inflation).powi(years as i32)
}

/// Capital gains tax applied to investment income
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainsTax {
    /// Base tax rate on gains
    pub rate: f64,
    /// Multiplicative surcharge on the base tax (1.055 = 5.5% surcharge)
    pub surcharge: f64,
}

impl GainsTax {
    pub fn new(rate: f64, surcharge: f64) -> Self {
        Self { rate, surcharge }
    }

    /// Effective share of a gain that is paid as tax
    pub fn effective_rate(&self) -> f64 {
        self.rate * self.surcharge
    }

    /// Amount left after tax
    pub fn net(&self, gross: f64) -> f64 {
        gross * (1.0 - self.effective_rate())
    }
}

impl Default for GainsTax {
    fn default() -> Self {
        // 25% flat tax plus 5.5% solidarity surcharge
        Self::new(0.25, 1.055)
    }
}

/// Net an amount with the default gains tax
pub fn subtract_gains_tax(gross: f64) -> f64 {
    GainsTax::default().net(gross)
}
