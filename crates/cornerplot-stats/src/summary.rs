//! One-line summaries of a sample column
//!
//! Default plot ranges come from `min`/`max`; the rest is reported when
//! loading tables.

use serde::{Deserialize, Serialize};

use crate::quantile::percentile_sorted;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Finite values seen
    pub count: usize,
    /// NaN and infinite values skipped
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub median: f64,
    /// Central 68% interval, the 16th and 84th percentiles
    pub sigma_interval: (f64, f64),
}

impl SummaryStats {
    pub fn from_data(data: &[f64]) -> Self {
        let mut finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        let missing = data.len() - finite.len();
        finite.sort_by(f64::total_cmp);

        let (Some(&min), Some(&max)) = (finite.first(), finite.last()) else {
            return Self {
                count: 0,
                missing,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std_dev: f64::NAN,
                median: f64::NAN,
                sigma_interval: (f64::NAN, f64::NAN),
            };
        };

        // Welford's update keeps the variance stable for large offsets
        let (n, mean, m2) = finite.iter().fold((0.0, 0.0, 0.0), |(n, mean, m2), &v| {
            let n = n + 1.0;
            let delta = v - mean;
            let mean = mean + delta / n;
            (n, mean, m2 + delta * (v - mean))
        });

        Self {
            count: finite.len(),
            missing,
            min,
            max,
            mean,
            std_dev: (m2 / n).sqrt(),
            median: percentile_sorted(&finite, 0.5),
            sigma_interval: (
                percentile_sorted(&finite, 0.16),
                percentile_sorted(&finite, 0.84),
            ),
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// True when the finite values span a non-empty interval
    pub fn has_dynamic_range(&self) -> bool {
        self.count > 0 && self.range() > 0.0
    }

    /// True when the column can go on a log axis
    pub fn is_positive(&self) -> bool {
        self.count > 0 && self.min > 0.0
    }
}
