//! Simplex projection tests.
//!
//! Cases are defined as data and checked against hand-computed projections.

use nalgebra::DVector;
use roballoc::prelude::*;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-12;

/// A projection case: input, scale, expected output
struct TestCase {
    name: &'static str,
    input: &'static [f64],
    scale: f64,
    expected: &'static [f64],
}

fn test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "already_on_simplex",
            input: &[0.25, 0.25, 0.5],
            scale: 1.0,
            expected: &[0.25, 0.25, 0.5],
        },
        TestCase {
            name: "uniform_shift_up",
            // theta = (0 - 1) / 4
            input: &[0.0, 0.0, 0.0, 0.0],
            scale: 1.0,
            expected: &[0.25, 0.25, 0.25, 0.25],
        },
        TestCase {
            name: "uniform_shift_down",
            // theta = (3 - 1) / 3
            input: &[1.0, 1.0, 1.0],
            scale: 1.0,
            expected: &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
        },
        TestCase {
            name: "clips_negative_tail",
            // support {0, 1}, theta = (3.0 + 2.5 - 1) / 2 = 2.25
            input: &[3.0, 2.5, 0.5, -1.0],
            scale: 1.0,
            expected: &[0.75, 0.25, 0.0, 0.0],
        },
        TestCase {
            name: "single_vertex",
            input: &[-2.0, 10.0, -3.0],
            scale: 1.0,
            expected: &[0.0, 1.0, 0.0],
        },
        TestCase {
            name: "all_negative",
            // support {0, 1}, theta = (-1 - 1.5 - 1) / 2 = -1.75
            input: &[-1.0, -1.5, -4.0],
            scale: 1.0,
            expected: &[0.75, 0.25, 0.0],
        },
        TestCase {
            name: "scaled_simplex",
            // support {3, 2}, theta = (3 + 2 - 3) / 2 = 1
            input: &[1.0, 2.0, 3.0],
            scale: 3.0,
            expected: &[0.0, 1.0, 2.0],
        },
        TestCase {
            name: "ties",
            input: &[0.5, 0.5, 0.5, 0.5],
            scale: 2.0,
            expected: &[0.5, 0.5, 0.5, 0.5],
        },
        TestCase {
            name: "huge_leader",
            // float spacing at 1e16 is 2, larger than the scale
            input: &[1e16, 0.0],
            scale: 1.0,
            expected: &[1.0, 0.0],
        },
        TestCase {
            name: "huge_single",
            input: &[1e17],
            scale: 1.0,
            expected: &[1.0],
        },
        TestCase {
            name: "huge_ties",
            input: &[1e16, 1e16, -1e16],
            scale: 1.0,
            expected: &[0.5, 0.5, 0.0],
        },
    ]
}

#[test]
fn test_projection_cases() {
    let mut failures = Vec::new();

    for case in test_cases() {
        let v = DVector::from_column_slice(case.input);
        match project_onto_simplex(&v, case.scale) {
            Ok(w) => {
                let expected = DVector::from_column_slice(case.expected);
                let err = (&w - &expected).amax();
                if err > TOL {
                    failures.push(format!("{}: got {:?}, max error {:e}", case.name, w.as_slice(), err));
                }
                if !is_on_simplex(&w, case.scale, TOL) {
                    failures.push(format!("{}: result off the simplex", case.name));
                }
            }
            Err(e) => failures.push(format!("{}: {}", case.name, e)),
        }
    }

    assert!(failures.is_empty(), "Failures:\n{}", failures.join("\n"));
}

#[test]
fn test_scaled_projection_is_multiple_of_unit_projection() {
    // proj_s(s v) = s proj_1(v)
    let v = DVector::from_vec(vec![0.3, -0.2, 0.9, 0.1, 0.4]);
    let unit = project_onto_simplex(&v, 1.0).unwrap();
    let scaled = project_onto_simplex(&(&v * 2.5), 2.5).unwrap();
    assert!((scaled - unit * 2.5).amax() < TOL);
}

#[test]
fn test_translation_invariance() {
    // Adding a constant to every component does not change the projection
    let v = DVector::from_vec(vec![0.3, -0.2, 0.9, 0.1]);
    let w = project_onto_simplex(&v, 1.0).unwrap();
    let shifted = project_onto_simplex(&v.add_scalar(7.0), 1.0).unwrap();
    assert!((w - shifted).amax() < 1e-12);
}

#[test]
fn test_error_conditions() {
    let v = DVector::from_vec(vec![0.5, 0.5]);
    assert!(matches!(
        project_onto_simplex(&v, 0.0),
        Err(AllocError::InvalidArgument(_))
    ));
    assert!(matches!(
        project_onto_simplex(&v, -2.0),
        Err(AllocError::InvalidArgument(_))
    ));
    assert!(matches!(
        project_onto_simplex(&DVector::from_vec(vec![f64::NAN; 3]), 1.0),
        Err(AllocError::ProjectionFailure(_))
    ));
}
