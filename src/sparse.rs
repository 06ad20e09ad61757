//! Sparse matrix utilities.
//!
//! Helper functions for building the nalgebra-sparse matrices handed to the
//! conic backend.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together. Out-of-range triplets are dropped.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
) -> CscMatrix<f64> {
    if rows.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for ((row, col), val) in rows.into_iter().zip(cols).zip(vals) {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}

/// Embed the upper triangle of the square `dense + shift * I` in the top-left corner of
/// a `dim x dim` CSC matrix.
///
/// Clarabel reads only the upper triangle of its quadratic cost, so a
/// symmetric matrix is stored once.
pub fn upper_triangle_csc(dense: &DMatrix<f64>, dim: usize, shift: f64) -> CscMatrix<f64> {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();

    for j in 0..dense.ncols() {
        for i in 0..=j {
            let v = if i == j { dense[(i, j)] + shift } else { dense[(i, j)] };
            if v.abs() > 1e-15 {
                rows.push(i);
                cols.push(j);
                vals.push(v);
            }
        }
    }

    csc_from_triplets(dim, dim, rows, cols, vals)
}

/// Convert CSC to dense matrix.
pub fn csc_to_dense(sparse: &CscMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(sparse.nrows(), sparse.ncols());
    for (row, col, val) in sparse.triplet_iter() {
        dense[(row, col)] = *val;
    }
    dense
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csc_from_triplets_sums_duplicates() {
        let m = csc_from_triplets(2, 2, vec![0, 0, 1], vec![1, 1, 0], vec![1.0, 2.0, 4.0]);
        let d = csc_to_dense(&m);
        assert_eq!(d[(0, 1)], 3.0);
        assert_eq!(d[(1, 0)], 4.0);
        assert_eq!(m.nnz(), 2);
    }

    #[test]
    fn test_csc_from_triplets_empty() {
        let m = csc_from_triplets(3, 4, vec![], vec![], vec![]);
        assert_eq!((m.nrows(), m.ncols(), m.nnz()), (3, 4, 0));
    }

    #[test]
    fn test_upper_triangle_with_shift_and_padding() {
        let dense = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 1.0]);
        let m = upper_triangle_csc(&dense, 3, 0.25);
        assert_eq!((m.nrows(), m.ncols()), (3, 3));
        let d = csc_to_dense(&m);
        assert_eq!(d[(0, 0)], 2.25);
        assert_eq!(d[(0, 1)], 0.5);
        assert_eq!(d[(1, 0)], 0.0);
        assert_eq!(d[(1, 1)], 1.25);
        assert_eq!(d[(2, 2)], 0.0);
    }
}
