//! Seeded sample sets shared by the integration tests

use cornerplot_core::Samples;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Standard normal draw (Box-Muller)
pub fn normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Four fifths unit Gaussian, one fifth Gaussian shifted by up to 5 per dimension
pub fn mixture(nsamples: usize, ndim: usize, seed: u64) -> Samples {
    let mut rng = StdRng::seed_from_u64(seed);
    let offset: Vec<f64> = (0..ndim).map(|_| 5.0 * rng.gen::<f64>()).collect();
    let n_main = 4 * nsamples / 5;

    let rows: Vec<Vec<f64>> = (0..nsamples)
        .map(|i| {
            (0..ndim)
                .map(|d| {
                    let shift = if i < n_main { 0.0 } else { offset[d] };
                    shift + normal(&mut rng)
                })
                .collect()
        })
        .collect();
    Samples::from_rows(&rows).unwrap()
}

/// Strictly positive samples for log axes
#[allow(dead_code)]
pub fn lognormal(nsamples: usize, ndim: usize, seed: u64) -> Samples {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..nsamples)
        .map(|_| (0..ndim).map(|_| normal(&mut rng).exp()).collect())
        .collect();
    Samples::from_rows(&rows).unwrap()
}

/// Uniform weights in [0, 1)
#[allow(dead_code)]
pub fn weights(nsamples: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..nsamples).map(|_| rng.gen()).collect()
}
