//! Matrix stuffing for the exact reference solve.
//!
//! Variables are `x = [w_0 .. w_{n-1}, t]`, with `t` present only when
//! `epsilon > 0`. Clarabel solves
//!
//! ```text
//! minimize    (1/2) x' P x + q' x
//! subject to  A x + s = b,  s in K
//! ```
//!
//! and the robust objective maps onto it as
//!
//! ```text
//! P = [Σ + λI, 0; 0, 0]      q = [-μ; ε]
//! zero cone:      1' w = 1
//! nonneg cone:    w >= 0
//! second order:   ||w||_2 <= t
//! ```

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CscMatrix;

use crate::objective::Penalties;
use crate::sparse::{csc_from_triplets, upper_triangle_csc};

/// Cone dimensions for Clarabel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConeDims {
    /// Number of zero cone (equality) constraints.
    pub zero: usize,
    /// Number of nonnegative cone constraints.
    pub nonneg: usize,
    /// Second-order cone dimensions (each entry is the cone dimension).
    pub soc: Vec<usize>,
}

impl ConeDims {
    /// Total number of constraint rows.
    pub fn total(&self) -> usize {
        self.zero + self.nonneg + self.soc.iter().sum::<usize>()
    }
}

/// Stuffed problem ready for Clarabel.
#[derive(Debug)]
pub struct StuffedProblem {
    /// Quadratic cost matrix P (upper triangle).
    pub p: CscMatrix<f64>,
    /// Linear cost vector q.
    pub q: Vec<f64>,
    /// Constraint matrix A.
    pub a: CscMatrix<f64>,
    /// Constraint vector b.
    pub b: Vec<f64>,
    /// Cone dimensions.
    pub cone_dims: ConeDims,
    /// Number of allocation weights; they occupy the first columns.
    pub n_weights: usize,
}

impl StuffedProblem {
    /// Total number of optimization variables.
    pub fn num_vars(&self) -> usize {
        self.q.len()
    }
}

/// Build the stuffed problem for dimension-checked `sigma` and `mu`.
pub fn stuff_problem(sigma: &DMatrix<f64>, mu: &DVector<f64>, penalties: Penalties) -> StuffedProblem {
    let n = mu.len();
    let robust = penalties.epsilon > 0.0;
    let num_vars = if robust { n + 1 } else { n };

    let p = upper_triangle_csc(sigma, num_vars, penalties.lam);

    let mut q: Vec<f64> = mu.iter().map(|m| -m).collect();
    if robust {
        q.push(penalties.epsilon);
    }

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    let mut b = Vec::new();

    // Budget: 1' w + s = 1, s = 0
    for i in 0..n {
        rows.push(0);
        cols.push(i);
        vals.push(1.0);
    }
    b.push(1.0);

    // Long-only: -w + s = 0, s >= 0
    for i in 0..n {
        rows.push(1 + i);
        cols.push(i);
        vals.push(-1.0);
        b.push(0.0);
    }

    let mut cone_dims = ConeDims {
        zero: 1,
        nonneg: n,
        soc: Vec::new(),
    };

    // Robustness epigraph: s = (t, w) in the second-order cone
    if robust {
        let base = 1 + n;
        rows.push(base);
        cols.push(n);
        vals.push(-1.0);
        b.push(0.0);
        for i in 0..n {
            rows.push(base + 1 + i);
            cols.push(i);
            vals.push(-1.0);
            b.push(0.0);
        }
        cone_dims.soc.push(n + 1);
    }

    let a = csc_from_triplets(cone_dims.total(), num_vars, rows, cols, vals);

    StuffedProblem {
        p,
        q,
        a,
        b,
        cone_dims,
        n_weights: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::csc_to_dense;

    fn data() -> (DMatrix<f64>, DVector<f64>) {
        (
            DMatrix::from_row_slice(2, 2, &[1.0, 0.2, 0.2, 2.0]),
            DVector::from_vec(vec![0.1, 0.3]),
        )
    }

    #[test]
    fn test_stuff_robust_problem() {
        let (sigma, mu) = data();
        let stuffed = stuff_problem(&sigma, &mu, Penalties::new(0.5, 0.1));

        assert_eq!(stuffed.num_vars(), 3);
        assert_eq!(stuffed.q, vec![-0.1, -0.3, 0.5]);
        assert_eq!(
            stuffed.cone_dims,
            ConeDims {
                zero: 1,
                nonneg: 2,
                soc: vec![3]
            }
        );
        assert_eq!(stuffed.b.len(), stuffed.cone_dims.total());

        let a = csc_to_dense(&stuffed.a);
        assert_eq!((a.nrows(), a.ncols()), (6, 3));
        assert_eq!(a.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0, 0.0]);
        assert_eq!(a[(3, 2)], -1.0);
        assert_eq!(a[(4, 0)], -1.0);
        assert_eq!(a[(5, 1)], -1.0);

        let p = csc_to_dense(&stuffed.p);
        assert!((p[(0, 0)] - 1.1).abs() < 1e-15);
        assert_eq!(p[(1, 0)], 0.0);
        assert_eq!(p[(2, 2)], 0.0);
    }

    #[test]
    fn test_stuff_without_robustness_drops_epigraph() {
        let (sigma, mu) = data();
        let stuffed = stuff_problem(&sigma, &mu, Penalties::default());

        assert_eq!(stuffed.num_vars(), 2);
        assert!(stuffed.cone_dims.soc.is_empty());
        assert_eq!(stuffed.cone_dims.total(), 3);
        assert_eq!(stuffed.b, vec![1.0, 0.0, 0.0]);
    }
}
