//! Exact reference solve via the Clarabel conic solver.
//!
//! Solves the same simplex-constrained robust objective as the iterative
//! solver, to interior-point accuracy. Used to certify projected gradient
//! results (see [`Solution::optimality_gap`](super::Solution::optimality_gap)).

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use super::stuffing::{stuff_problem, ConeDims};
use crate::error::{AllocError, Result};
use crate::objective::{objective_value, Penalties};
use crate::simplex::project_onto_simplex;

/// Solution status from the conic solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConicStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Maximum iterations reached.
    MaxIterations,
    /// Numerical difficulties.
    NumericalError,
    /// Unknown status.
    Unknown,
}

impl From<SolverStatus> for ConicStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => ConicStatus::Optimal,
            SolverStatus::PrimalInfeasible => ConicStatus::Infeasible,
            SolverStatus::DualInfeasible => ConicStatus::Unbounded,
            SolverStatus::MaxIterations => ConicStatus::MaxIterations,
            SolverStatus::MaxTime => ConicStatus::MaxIterations,
            SolverStatus::NumericalError => ConicStatus::NumericalError,
            _ => ConicStatus::Unknown,
        }
    }
}

/// Conic solver settings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConicSettings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for ConicSettings {
    fn default() -> Self {
        ConicSettings {
            verbose: false,
            max_iter: 100,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Exact solution of the robust allocation problem.
#[derive(Debug, Clone)]
pub struct ExactSolution {
    /// Solution status (always `Optimal` when returned from a solve).
    pub status: ConicStatus,
    /// Optimal allocation, on the unit simplex.
    pub weights: DVector<f64>,
    /// Objective `J` at `weights`.
    pub value: f64,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Number of interior-point iterations.
    pub iterations: u32,
}

/// Solve the robust allocation problem with Clarabel.
///
/// `sigma` and `mu` must already be dimension-checked.
pub(crate) fn solve_exact(
    sigma: &DMatrix<f64>,
    mu: &DVector<f64>,
    penalties: Penalties,
    settings: &ConicSettings,
) -> Result<ExactSolution> {
    penalties.validate()?;
    let problem = stuff_problem(sigma, mu, penalties);

    let p = to_clarabel_csc(&problem.p);
    let a = to_clarabel_csc(&problem.a);
    let cones = to_clarabel_cones(&problem.cone_dims);

    let clarabel_settings = DefaultSettingsBuilder::default()
        .verbose(settings.verbose)
        .max_iter(settings.max_iter)
        .time_limit(settings.time_limit)
        .tol_gap_abs(settings.tol_gap_abs)
        .tol_gap_rel(settings.tol_gap_rel)
        .build()
        .map_err(|e| AllocError::SolverError(format!("invalid conic settings: {}", e)))?;

    let mut solver = DefaultSolver::new(&p, &problem.q, &a, &problem.b, &cones, clarabel_settings);
    solver.solve();

    let status: ConicStatus = solver.solution.status.into();
    let solve_time = solver.solution.solve_time;
    let iterations = solver.info.iterations;

    if status != ConicStatus::Optimal {
        warn!(?status, iterations, "exact reference solve did not reach optimality");
        return Err(match status {
            ConicStatus::Infeasible => AllocError::SolverError("Problem is infeasible".into()),
            ConicStatus::Unbounded => AllocError::SolverError(
                "Problem is unbounded; is the covariance positive semi-definite?".into(),
            ),
            ConicStatus::MaxIterations => {
                AllocError::SolverError("Maximum iterations reached".into())
            }
            ConicStatus::NumericalError => AllocError::NumericalError(
                "Solver encountered numerical difficulties".into(),
            ),
            _ => AllocError::SolverError("Unknown solver status".into()),
        });
    }

    // Interior-point iterates can sit a hair outside the boundary.
    let raw = DVector::from_column_slice(&solver.solution.x[..problem.n_weights]);
    let weights = project_onto_simplex(&raw, 1.0)?;
    let value = objective_value(&weights, sigma, mu, penalties);

    debug!(iterations, solve_time, value, "exact reference solve finished");

    Ok(ExactSolution {
        status,
        weights,
        value,
        solve_time,
        iterations,
    })
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert cone dimensions to Clarabel cones, in stuffing order.
fn to_clarabel_cones(dims: &ConeDims) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if dims.zero > 0 {
        cones.push(SupportedConeT::ZeroConeT(dims.zero));
    }

    if dims.nonneg > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(dims.nonneg));
    }

    for &soc_dim in &dims.soc {
        cones.push(SupportedConeT::SecondOrderConeT(soc_dim));
    }

    cones
}
