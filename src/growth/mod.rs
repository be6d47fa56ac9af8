//! Compound growth engines and the inverse rate solver

mod compound;
mod polynomial;
mod solver;

pub use compound::{compound_interest, simulate_compound_interest, GrowthSchedule};
pub use polynomial::{bracketed_root, BracketSearch, Polynomial};
pub use solver::{
    compound_interest_rate, growth_polynomial, RateSolution, IMAGINARY_TOLERANCE,
    RESIDUAL_TOLERANCE,
};
