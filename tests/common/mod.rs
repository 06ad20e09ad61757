//! Shared fixtures for integration tests.
//!
//! Random inputs come from an explicitly passed, seeded generator so every
//! test owns its randomness.

#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Seeded generator for one test.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `Σ = A'A + 1e-3 I` with `A_ij ~ N(0, a_std)`, and `μ_i ~ N(mu_mean, mu_std)`.
pub fn random_market(
    rng: &mut StdRng,
    n: usize,
    a_std: f64,
    mu_mean: f64,
    mu_std: f64,
) -> (DMatrix<f64>, DVector<f64>) {
    let a_dist = Normal::new(0.0, a_std).expect("valid normal");
    let a = DMatrix::from_fn(n, n, |_, _| a_dist.sample(rng));
    let sigma = a.transpose() * &a + DMatrix::identity(n, n) * 1e-3;

    let mu_dist = Normal::new(mu_mean, mu_std).expect("valid normal");
    let mu = DVector::from_fn(n, |_, _| mu_dist.sample(rng));

    (sigma, mu)
}

/// Population variance of the components of `w`.
pub fn component_variance(w: &DVector<f64>) -> f64 {
    let mean = w.mean();
    w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / w.len() as f64
}

/// Route solver logs to the test harness (`RUST_LOG=roballoc=trace`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
