//! Solver interface for roballoc.
//!
//! This module provides:
//! - Projected gradient descent on the unit simplex (the primary solver)
//! - Matrix stuffing and Clarabel integration for the exact reference solve

pub mod clarabel;
pub mod pgd;
pub mod stuffing;

pub use self::clarabel::{ConicSettings, ConicStatus, ExactSolution};
pub use pgd::{solve, Settings, Solution, SolveStatus};
pub use stuffing::{stuff_problem, ConeDims, StuffedProblem};
