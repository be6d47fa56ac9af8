//! Real polynomials and the root finders used by the rate solver
//!
//! Exact roots come from the eigenvalues of the companion matrix. When those
//! are unusable, [`bracketed_root`] scans outward from a seed for a sign
//! change and bisects it.

use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix};

/// Schur iterations allowed per unit of polynomial degree
const SCHUR_ITERATIONS_PER_DEGREE: usize = 100;

/// Polynomial with real coefficients in ascending order of power
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// `coefficients[k]` multiplies `x^k`
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree after dropping zero high-order coefficients
    pub fn degree(&self) -> usize {
        self.trimmed().len().saturating_sub(1)
    }

    /// Evaluate with Horner's scheme
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Divide by `(x - root)`, returning the quotient and the remainder
    pub fn deflate(&self, root: f64) -> (Polynomial, f64) {
        let trimmed = self.trimmed();
        if trimmed.len() < 2 {
            return (Polynomial::new(Vec::new()), trimmed.first().copied().unwrap_or(0.0));
        }

        let degree = trimmed.len() - 1;
        let mut quotient = vec![0.0; degree];
        quotient[degree - 1] = trimmed[degree];
        for k in (1..degree).rev() {
            quotient[k - 1] = trimmed[k] + root * quotient[k];
        }
        let remainder = trimmed[0] + root * quotient[0];

        (Polynomial::new(quotient), remainder)
    }

    /// All complex roots, or `None` if the eigenvalue iteration did not converge
    ///
    /// Zero low-order coefficients contribute exact roots at the origin and
    /// are split off before the companion matrix is built.
    pub fn roots(&self) -> Option<Vec<Complex<f64>>> {
        let trimmed = self.trimmed();
        let zero_roots = trimmed.iter().take_while(|&&c| c == 0.0).count();
        let core = &trimmed[zero_roots..];

        let mut roots = vec![Complex::new(0.0, 0.0); zero_roots];
        if core.len() < 2 {
            return Some(roots);
        }

        let companion = companion_matrix(core);
        let max_iterations = SCHUR_ITERATIONS_PER_DEGREE * companion.nrows();
        let schur = Schur::try_new(companion, f64::EPSILON, max_iterations)?;
        roots.extend(schur.complex_eigenvalues().iter().copied());

        Some(roots)
    }

    fn trimmed(&self) -> &[f64] {
        let len = self
            .coefficients
            .iter()
            .rposition(|&c| c != 0.0)
            .map_or(0, |i| i + 1);
        &self.coefficients[..len]
    }
}

/// Companion matrix of a polynomial whose leading and constant terms are non-zero
///
/// First row holds the negated normalised coefficients, the sub-diagonal is one.
fn companion_matrix(coefficients: &[f64]) -> DMatrix<f64> {
    let degree = coefficients.len() - 1;
    let leading = coefficients[degree];

    let mut matrix = DMatrix::zeros(degree, degree);
    for col in 0..degree {
        matrix[(0, col)] = -coefficients[degree - 1 - col] / leading;
    }
    for row in 1..degree {
        matrix[(row, row - 1)] = 1.0;
    }
    matrix
}

/// Settings for the bracketed fallback search
#[derive(Debug, Clone, Copy)]
pub struct BracketSearch {
    /// First step away from the seed
    pub initial_step: f64,
    /// Search never goes above this point
    pub upper_limit: f64,
    /// Search never goes below this point
    pub lower_limit: f64,
    /// Bisection stops when the bracket is narrower than this
    pub tolerance: f64,
    /// Bisection iteration cap
    pub max_iterations: u32,
}

impl Default for BracketSearch {
    fn default() -> Self {
        Self {
            initial_step: 1e-6,
            upper_limit: 10.0,
            lower_limit: 0.0,
            tolerance: 1e-15,
            max_iterations: 200,
        }
    }
}

/// Root of `f` found by scanning outward from `seed` and bisecting
///
/// The scan goes upward first, then downward, doubling the step each time.
/// Without a sign change the scanned point with the smallest `|f|` is
/// returned, so the result is always a best candidate rather than a proven root.
pub fn bracketed_root<F>(f: F, seed: f64, search: &BracketSearch) -> f64
where
    F: Fn(f64) -> f64,
{
    let f_seed = f(seed);
    if f_seed == 0.0 {
        return seed;
    }

    let mut best = (seed, f_seed.abs());

    for direction in [1.0, -1.0] {
        let mut a = seed;
        let mut fa = f_seed;
        let mut step = search.initial_step;

        loop {
            let b = (seed + direction * step).clamp(search.lower_limit, search.upper_limit);
            let fb = f(b);

            if fb.is_finite() && fb.abs() < best.1 {
                best = (b, fb.abs());
            }
            if fb == 0.0 {
                return b;
            }
            if fa * fb < 0.0 {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                return bisection(&f, lo, hi, search);
            }

            if b <= search.lower_limit || b >= search.upper_limit || !fb.is_finite() {
                break;
            }
            a = b;
            fa = fb;
            step *= 2.0;
        }
    }

    best.0
}

/// Bisection on a bracket known to contain a sign change
fn bisection<F>(f: &F, mut low: f64, mut high: f64, search: &BracketSearch) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut f_low = f(low);

    for _ in 0..search.max_iterations {
        let mid = (low + high) / 2.0;
        let f_mid = f(mid);

        if f_mid == 0.0 || (high - low) / 2.0 < search.tolerance {
            return mid;
        }

        if f_mid * f_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }

    (low + high) / 2.0
}
