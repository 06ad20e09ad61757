//! Problem definition and solving API.
//!
//! A `Problem` owns the validated market data of one allocation problem:
//! - A covariance matrix `Σ` (n x n, symmetric)
//! - An expected-return vector `μ` (length n)
//!
//! ```ignore
//! let problem = Problem::new(sigma, mu)?;
//! let solution = problem.solve_with(&Settings { epsilon: 0.3, ..Default::default() })?;
//! let exact = problem.solve_exact(Penalties::new(0.3, 0.0))?;
//! assert!(solution.optimality_gap(&exact) < 1e-6);
//! ```
//!
//! Positive semi-definiteness of `Σ` is assumed, not checked.

use nalgebra::{DMatrix, DVector};

use crate::error::{AllocError, Result};
use crate::objective::{gradient_value, objective_value, Penalties};
use crate::solver::clarabel::{solve_exact, ConicSettings, ExactSolution};
use crate::solver::pgd::{run, Settings, Solution};

/// Relative tolerance for the covariance symmetry check.
const SYMMETRY_TOL: f64 = 1e-9;

/// A robust allocation problem.
#[derive(Debug, Clone)]
pub struct Problem {
    sigma: DMatrix<f64>,
    mu: DVector<f64>,
}

impl Problem {
    /// Create a problem from covariance `sigma` and expected returns `mu`.
    ///
    /// # Errors
    ///
    /// - [`AllocError::InvalidArgument`] if `mu` is empty, any entry is not
    ///   finite, or `sigma` is not symmetric.
    /// - [`AllocError::ShapeMismatch`] if `sigma` is not `n x n` for `n = mu.len()`.
    pub fn new(sigma: DMatrix<f64>, mu: DVector<f64>) -> Result<Self> {
        validate_data(&sigma, &mu)?;
        Ok(Problem { sigma, mu })
    }

    /// Number of assets.
    pub fn dim(&self) -> usize {
        self.mu.len()
    }

    /// Covariance matrix.
    pub fn sigma(&self) -> &DMatrix<f64> {
        &self.sigma
    }

    /// Expected returns.
    pub fn mu(&self) -> &DVector<f64> {
        &self.mu
    }

    /// Objective `J(w)` for this problem.
    pub fn objective(&self, w: &DVector<f64>, penalties: Penalties) -> Result<f64> {
        self.check_allocation(w)?;
        Ok(objective_value(w, &self.sigma, &self.mu, penalties))
    }

    /// (Sub)gradient of `J` at `w` for this problem.
    pub fn gradient(&self, w: &DVector<f64>, penalties: Penalties) -> Result<DVector<f64>> {
        self.check_allocation(w)?;
        Ok(gradient_value(w, &self.sigma, &self.mu, penalties))
    }

    /// Solve with default settings, starting from the uniform allocation.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_with(&Settings::default())
    }

    /// Solve with custom settings, starting from the uniform allocation.
    pub fn solve_with(&self, settings: &Settings) -> Result<Solution> {
        run(&self.sigma, &self.mu, settings, None)
    }

    /// Solve with custom settings from an optional starting point.
    ///
    /// `None` starts from the uniform allocation; `Some(w0)` starts from the
    /// projection of `w0` onto the simplex.
    pub fn solve_from(&self, initial: Option<&DVector<f64>>, settings: &Settings) -> Result<Solution> {
        run(&self.sigma, &self.mu, settings, initial)
    }

    /// Solve exactly with the conic backend and default conic settings.
    pub fn solve_exact(&self, penalties: Penalties) -> Result<ExactSolution> {
        self.solve_exact_with(penalties, &ConicSettings::default())
    }

    /// Solve exactly with the conic backend and custom conic settings.
    pub fn solve_exact_with(
        &self,
        penalties: Penalties,
        settings: &ConicSettings,
    ) -> Result<ExactSolution> {
        solve_exact(&self.sigma, &self.mu, penalties, settings)
    }

    fn check_allocation(&self, w: &DVector<f64>) -> Result<()> {
        if w.len() != self.dim() {
            return Err(AllocError::shape(
                format!("allocation of length {}", self.dim()),
                format!("length {}", w.len()),
            ));
        }
        Ok(())
    }
}

/// Validate covariance and returns: shapes, finiteness, symmetry.
pub(crate) fn validate_data(sigma: &DMatrix<f64>, mu: &DVector<f64>) -> Result<()> {
    let n = mu.len();
    if n == 0 {
        return Err(AllocError::InvalidArgument(
            "expected returns must have at least one asset".into(),
        ));
    }
    if sigma.shape() != (n, n) {
        return Err(AllocError::shape(
            format!("covariance {}x{}", n, n),
            format!("{}x{}", sigma.nrows(), sigma.ncols()),
        ));
    }
    if mu.iter().chain(sigma.iter()).any(|x| !x.is_finite()) {
        return Err(AllocError::InvalidArgument(
            "covariance and expected returns must be finite".into(),
        ));
    }

    let scale = sigma.amax().max(1.0);
    for j in 0..n {
        for i in 0..j {
            if (sigma[(i, j)] - sigma[(j, i)]).abs() > SYMMETRY_TOL * scale {
                return Err(AllocError::InvalidArgument(format!(
                    "covariance is not symmetric at ({}, {}): {} vs {}",
                    i,
                    j,
                    sigma[(i, j)],
                    sigma[(j, i)]
                )));
            }
        }
    }
    Ok(())
}
