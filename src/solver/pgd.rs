//! Projected gradient descent on the unit simplex.
//!
//! Each iteration takes a fixed step of length `eta` against the
//! (sub)gradient and projects back onto the simplex:
//!
//! ```text
//! w_{k+1} = proj_simplex(w_k - eta * g(w_k))
//! ```
//!
//! The loop starts from the uniform allocation, or from a caller-supplied
//! point re-projected onto the simplex, and ends in one of two states:
//! [`SolveStatus::Converged`] or [`SolveStatus::MaxIterations`].
//!
//! Convergence is only checked when history is recorded: the objective of
//! each new iterate is compared with the previous one (the starting point's
//! objective for the first iteration). Without history the loop always runs
//! exactly `max_iter` iterations.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use super::clarabel::ExactSolution;
use crate::error::{AllocError, Result};
use crate::objective::{gradient_value, objective_value, Penalties};
use crate::problem::validate_data;
use crate::simplex::{project_onto_simplex, uniform};

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// Objective change between consecutive iterates fell below `tol`.
    Converged,
    /// Ran `max_iter` iterations without meeting the tolerance.
    MaxIterations,
}

/// Solver hyperparameters.
///
/// Override individual fields with struct update syntax:
///
/// ```
/// use roballoc::Settings;
///
/// let settings = Settings {
///     epsilon: 0.3,
///     record_history: true,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Robustness radius, weight on `||w||_2`.
    pub epsilon: f64,
    /// Ridge weight.
    pub lam: f64,
    /// Step size.
    pub eta: f64,
    /// Iteration cap.
    pub max_iter: u32,
    /// Convergence threshold on the objective change.
    pub tol: f64,
    /// Record the objective after every iteration (enables the tolerance check).
    pub record_history: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            epsilon: 0.1,
            lam: 0.0,
            eta: 0.2,
            max_iter: 2000,
            tol: 1e-8,
            record_history: false,
        }
    }
}

impl Settings {
    /// Penalty weights carried by these settings.
    pub fn penalties(&self) -> Penalties {
        Penalties::new(self.epsilon, self.lam)
    }

    /// Check every hyperparameter against its domain.
    pub fn validate(&self) -> Result<()> {
        self.penalties().validate()?;
        if !self.eta.is_finite() || self.eta <= 0.0 {
            return Err(AllocError::InvalidArgument(format!(
                "eta must be finite and > 0, got {}",
                self.eta
            )));
        }
        if self.max_iter == 0 {
            return Err(AllocError::InvalidArgument("max_iter must be > 0".into()));
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(AllocError::InvalidArgument(format!(
                "tol must be finite and >= 0, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Result of a projected gradient solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the loop terminated.
    pub status: SolveStatus,
    /// Final allocation, on the unit simplex.
    pub weights: DVector<f64>,
    /// Objective `J` at `weights`.
    pub value: f64,
    /// Number of completed iterations.
    pub iterations: u32,
    /// Objective after each iteration, present only when recording was requested.
    pub history: Option<Vec<f64>>,
}

impl Solution {
    /// Check whether the tolerance was met.
    pub fn is_converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }

    /// Recorded objective values, if any.
    pub fn history(&self) -> Option<&[f64]> {
        self.history.as_deref()
    }

    /// Excess objective over an exact solve of the same problem and penalties.
    ///
    /// Non-negative up to the exact solver's tolerance.
    pub fn optimality_gap(&self, exact: &ExactSolution) -> f64 {
        self.value - exact.value
    }
}

/// Solve `min J(w)` over the unit simplex by projected gradient descent.
///
/// `initial` is re-projected onto the simplex; `None` starts from the uniform
/// allocation `1/n`.
///
/// # Errors
///
/// - [`AllocError::ShapeMismatch`] / [`AllocError::InvalidArgument`] for
///   malformed `sigma`, `mu`, `initial`, or settings.
/// - [`AllocError::ProjectionFailure`] from any projection step; the solve is
///   aborted and no partial result is returned.
pub fn solve(
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    settings: &Settings,
    initial: Option<&DVector<f64>>,
) -> Result<Solution> {
    validate_data(sigma, mu)?;
    run(sigma, mu, settings, initial)
}

/// The descent loop on validated data.
pub(crate) fn run(
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    settings: &Settings,
    initial: Option<&DVector<f64>>,
) -> Result<Solution> {
    settings.validate()?;
    let n = mu.len();
    let penalties = settings.penalties();

    let mut w = match initial {
        None => uniform(n)?,
        Some(start) if start.len() != n => {
            return Err(AllocError::shape(
                format!("initial allocation of length {}", n),
                format!("length {}", start.len()),
            ));
        }
        Some(start) => project_onto_simplex(start, 1.0)?,
    };

    debug!(
        n,
        epsilon = settings.epsilon,
        lam = settings.lam,
        eta = settings.eta,
        max_iter = settings.max_iter,
        tol = settings.tol,
        record_history = settings.record_history,
        "starting projected gradient descent"
    );

    let mut history = settings
        .record_history
        .then(|| Vec::with_capacity(settings.max_iter.min(4096) as usize));
    let mut last = objective_value(&w, sigma, mu, penalties);
    let mut status = SolveStatus::MaxIterations;
    let mut iterations = 0;

    for iteration in 1..=settings.max_iter {
        let g = gradient_value(&w, sigma, mu, penalties);
        w = project_onto_simplex(&(&w - g * settings.eta), 1.0)?;
        iterations = iteration;

        let Some(recorded) = history.as_mut() else {
            continue;
        };
        let value = objective_value(&w, sigma, mu, penalties);
        recorded.push(value);
        trace!(iteration, value, "iterate");

        if (last - value).abs() < settings.tol {
            status = SolveStatus::Converged;
            break;
        }
        last = value;
    }

    let value = objective_value(&w, sigma, mu, penalties);
    debug!(?status, iterations, value, "projected gradient descent finished");

    Ok(Solution {
        status,
        weights: w,
        value,
        iterations,
        history,
    })
}
