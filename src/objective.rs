//! Robust regularized objective and its (sub)gradient.
//!
//! ```text
//! J(w) = 0.5 * w' Σ w  -  μ' w  +  ε * ||w||_2  +  0.5 * λ * ||w||_2^2
//! ```
//!
//! The quadratic and ridge terms are smooth. The robustness term `ε ||w||_2`
//! is convex but not differentiable at the origin; [`gradient`] replaces its
//! subgradient with the stabilized `ε w / (||w||_2 + δ)`, `δ = STABILIZER`.
//! On the simplex with positive total the origin is never reached, so the
//! stabilizer only slightly biases the direction where `||w||_2` is tiny.
//! Exact subgradient selection at `w = 0` is not modeled.

use nalgebra::{DMatrix, DVector};

use crate::error::{AllocError, Result};

/// Stabilization constant `δ` in the robustness-term gradient.
pub const STABILIZER: f64 = 1e-12;

/// Penalty weights of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Penalties {
    /// Robustness radius `ε`, weight on `||w||_2`.
    pub epsilon: f64,
    /// Ridge weight `λ`, weight on `0.5 * ||w||_2^2`.
    pub lam: f64,
}

impl Penalties {
    /// Create penalty weights.
    pub fn new(epsilon: f64, lam: f64) -> Self {
        Penalties { epsilon, lam }
    }

    /// Check that both weights are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("epsilon", self.epsilon), ("lam", self.lam)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AllocError::InvalidArgument(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Evaluate `J(w)` for the given covariance, expected returns and penalties.
///
/// # Errors
///
/// Returns [`AllocError::ShapeMismatch`] if `sigma` is not `n x n` or `mu`
/// does not have length `n = w.len()`. Values are not checked: non-finite
/// inputs produce a non-finite result.
pub fn evaluate_objective(
    w: &DVector<f64>,
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    penalties: Penalties,
) -> Result<f64> {
    check_dims(w, sigma, mu)?;
    Ok(objective_value(w, sigma, mu, penalties))
}

/// (Sub)gradient of `J` at `w`; a descent step moves along `-gradient`.
///
/// ```text
/// g = Σ w - μ + λ w + ε w / (||w||_2 + δ)
/// ```
///
/// # Errors
///
/// Same shape checks as [`evaluate_objective`].
pub fn gradient(
    w: &DVector<f64>,
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    penalties: Penalties,
) -> Result<DVector<f64>> {
    check_dims(w, sigma, mu)?;
    Ok(gradient_value(w, sigma, mu, penalties))
}

/// Objective on pre-validated dimensions.
pub(crate) fn objective_value(
    w: &DVector<f64>,
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    penalties: Penalties,
) -> f64 {
    let quad = 0.5 * w.dot(&(sigma * w));
    let lin = -mu.dot(w);
    let l2 = penalties.epsilon * w.norm();
    let ridge = 0.5 * penalties.lam * w.norm_squared();
    quad + lin + l2 + ridge
}

/// Gradient on pre-validated dimensions.
pub(crate) fn gradient_value(
    w: &DVector<f64>,
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    penalties: Penalties,
) -> DVector<f64> {
    let robust_scale = penalties.epsilon / (w.norm() + STABILIZER);
    sigma * w - mu + w * (penalties.lam + robust_scale)
}

fn check_dims(w: &DVector<f64>, sigma: &DMatrix<f64>, mu: &DVector<f64>) -> Result<()> {
    let n = w.len();
    if sigma.shape() != (n, n) {
        return Err(AllocError::shape(
            format!("covariance {}x{}", n, n),
            format!("{}x{}", sigma.nrows(), sigma.ncols()),
        ));
    }
    if mu.len() != n {
        return Err(AllocError::shape(
            format!("returns of length {}", n),
            format!("length {}", mu.len()),
        ));
    }
    Ok(())
}
