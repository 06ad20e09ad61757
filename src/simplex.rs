//! Euclidean projection onto the scaled probability simplex.
//!
//! The simplex of total `s` is the set `{w | w >= 0, sum(w) = s}`. Projection
//! uses the closed-form sort-and-threshold rule: sort descending, find the
//! last index `rho` where `u[rho] * (rho + 1) > prefix[rho] - s`, shift every
//! component by `theta = (prefix[rho] - s) / (rho + 1)` and clip at zero.
//! Entries are first shifted by their maximum, so huge inputs whose float
//! spacing exceeds `s` still project exactly. Cost is dominated by the sort,
//! O(n log n).

use nalgebra::DVector;

use crate::error::{AllocError, Result};

/// Project `v` onto `{w | w >= 0, sum(w) = scale}`.
///
/// Returns the unique minimizer of `||w - v||_2` over the scaled simplex,
/// with components in the original order of `v`. A final renormalization
/// by the actual total absorbs floating-point drift; it only rescales by a
/// positive factor, so no component changes sign.
///
/// # Errors
///
/// - [`AllocError::InvalidArgument`] if `scale <= 0` (or NaN) or `v` is empty.
/// - [`AllocError::ProjectionFailure`] if `v` has non-finite entries or the
///   projected total is not a positive finite number. Degenerate results are
///   never silently renormalized.
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use roballoc::simplex::project_onto_simplex;
///
/// let w = project_onto_simplex(&DVector::from_vec(vec![2.0, 0.0]), 1.0).unwrap();
/// assert_eq!(w.as_slice(), &[1.0, 0.0]);
/// ```
pub fn project_onto_simplex(v: &DVector<f64>, scale: f64) -> Result<DVector<f64>> {
    if !(scale > 0.0) {
        return Err(AllocError::InvalidArgument(format!(
            "simplex scale must be > 0, got {}",
            scale
        )));
    }
    if v.is_empty() {
        return Err(AllocError::InvalidArgument(
            "cannot project an empty vector".into(),
        ));
    }
    if let Some(bad) = v.iter().position(|x| !x.is_finite()) {
        return Err(AllocError::ProjectionFailure(format!(
            "input component {} is not finite ({})",
            bad, v[bad]
        )));
    }

    // Shift so the largest entry is 0; the projection is invariant to it and
    // index 0 then always passes the support test, whatever the magnitude.
    let peak = v.max();
    let shifted = v.map(|vi| vi - peak);

    let mut u: Vec<f64> = shifted.iter().copied().collect();
    u.sort_unstable_by(|a, b| b.total_cmp(a));

    // Last index satisfying the threshold condition, with its prefix sum.
    let mut support = None;
    let mut prefix = 0.0;
    for (i, &ui) in u.iter().enumerate() {
        prefix += ui;
        if ui * (i as f64 + 1.0) > prefix - scale {
            support = Some((i, prefix));
        }
    }
    let (rho, prefix) = support.ok_or_else(|| {
        AllocError::ProjectionFailure("no component satisfies the support condition".into())
    })?;

    let theta = (prefix - scale) / (rho as f64 + 1.0);
    let w = shifted.map(|si| (si - theta).max(0.0));

    let total = w.sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(AllocError::ProjectionFailure(format!(
            "projected total {} is not a positive finite number",
            total
        )));
    }

    Ok(w * (scale / total))
}

/// The uniform allocation `1/n` on the unit simplex.
///
/// # Errors
///
/// Returns [`AllocError::InvalidArgument`] if `n == 0`.
pub fn uniform(n: usize) -> Result<DVector<f64>> {
    if n == 0 {
        return Err(AllocError::InvalidArgument(
            "uniform allocation needs at least one component".into(),
        ));
    }
    Ok(DVector::from_element(n, 1.0 / n as f64))
}

/// Check that `w` lies on the simplex of total `scale`, within `tol`.
pub fn is_on_simplex(w: &DVector<f64>, scale: f64, tol: f64) -> bool {
    !w.is_empty()
        && w.iter().all(|&x| x.is_finite() && x >= 0.0)
        && (w.sum() - scale).abs() <= tol
}
