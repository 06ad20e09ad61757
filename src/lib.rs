//! # roballoc
//!
//! Robust, regularized allocation on the probability simplex.
//!
//! roballoc finds non-negative weights summing to one that minimize
//!
//! ```text
//! J(w) = 0.5 * w' Σ w  -  μ' w  +  ε * ||w||_2  +  0.5 * λ * ||w||_2^2
//! ```
//!
//! trading off variance, expected return, and concentration.
//!
//! ## Quick Start
//!
//! ```
//! use nalgebra::{DMatrix, DVector};
//! use roballoc::prelude::*;
//!
//! let sigma = DMatrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.09]);
//! let mu = DVector::from_vec(vec![0.08, 0.12]);
//!
//! let solution = Problem::new(sigma, mu)?
//!     .solve_with(&Settings { record_history: true, ..Default::default() })?;
//!
//! assert!((solution.weights.sum() - 1.0).abs() < 1e-9);
//! # Ok::<(), roballoc::AllocError>(())
//! ```
//!
//! ## Components
//!
//! - **Simplex projection** ([`simplex`]): exact O(n log n) Euclidean projection
//! - **Objective and gradient** ([`objective`]): `J` and its stabilized subgradient
//! - **Projected gradient descent** ([`solver::pgd`]): fixed-step descent with
//!   optional objective history and tolerance check
//! - **Exact reference** ([`solver::clarabel`]): the same problem solved by the
//!   Clarabel interior-point solver, for certifying iterative results
//!
//! Every solve is a pure function of its inputs; independent solves can run
//! in parallel without coordination.

pub mod error;
pub mod objective;
pub mod problem;
pub mod simplex;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use roballoc::prelude::*;
/// ```
pub mod prelude {
    // Projection
    pub use crate::simplex::{is_on_simplex, project_onto_simplex, uniform};

    // Objective
    pub use crate::objective::{evaluate_objective, gradient, Penalties, STABILIZER};

    // Problem
    pub use crate::problem::Problem;

    // Solver
    pub use crate::solver::{
        solve, ConicSettings, ConicStatus, ExactSolution, Settings, Solution, SolveStatus,
    };

    // Errors
    pub use crate::error::{AllocError, Result};
}

// Re-export main types at crate root
pub use error::{AllocError, Result};
pub use objective::{evaluate_objective, Penalties};
pub use problem::Problem;
pub use simplex::project_onto_simplex;
pub use solver::{solve, Settings, Solution, SolveStatus};
