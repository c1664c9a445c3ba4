//! Density thresholds for credible contours
//!
//! A contour at mass `m` is drawn at the density value below which the
//! binned histogram holds `1 - m` of the total weight, so the region above
//! the threshold encloses roughly `m` of the sample.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Default enclosed masses: the 2D Gaussian equivalents of 0.5σ, 1σ, 1.5σ and 2σ
pub fn default_levels() -> Vec<f64> {
    [0.5, 1.0, 1.5, 2.0]
        .iter()
        .map(|&s| sigma_to_mass(s))
        .collect()
}

/// Mass enclosed by the `sigma` contour of a 2D Gaussian
pub fn sigma_to_mass(sigma: f64) -> f64 {
    1.0 - (-0.5 * sigma * sigma).exp()
}

/// Density thresholds for a set of enclosed masses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLevels {
    /// Strictly increasing density thresholds
    pub values: Vec<f64>,
    /// Whether duplicate thresholds had to be nudged apart
    pub degenerate: bool,
}

impl ContourLevels {
    /// Lowest threshold (outermost contour)
    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }
}

/// Compute density thresholds for each mass in `levels`
pub fn credible_levels(h: &Array2<f64>, levels: &[f64]) -> StatsResult<ContourLevels> {
    let mut flat: Vec<f64> = h.iter().copied().collect();
    flat.sort_by(|a, b| b.total_cmp(a));

    let total: f64 = flat.iter().sum();
    if !(total > 0.0) {
        return Err(StatsError::EmptyHistogram);
    }

    let mut cumulative = Vec::with_capacity(flat.len());
    let mut acc = 0.0;
    for v in &flat {
        acc += v;
        cumulative.push(acc / total);
    }

    let mut values: Vec<f64> = levels
        .iter()
        .map(|&level| {
            // Last bin (in descending order) whose cumulative mass is within the level
            cumulative
                .iter()
                .rposition(|&c| c <= level)
                .map_or(flat[0], |idx| flat[idx])
        })
        .collect();
    values.sort_by(f64::total_cmp);

    let mut degenerate = false;
    while let Some(idx) = values.windows(2).position(|w| w[1] - w[0] == 0.0) {
        degenerate = true;
        values[idx] *= 1.0 - 1e-4;
        if values[idx] == values[idx + 1] {
            // Zero threshold cannot be scaled apart
            values[idx] -= 1e-12;
        }
    }
    values.sort_by(f64::total_cmp);

    Ok(ContourLevels { values, degenerate })
}
