//! Sample quantiles
//!
//! Unweighted quantiles interpolate linearly between order statistics, so
//! `quantile(x, [0.5])` of an even-length sample is the mean of the two
//! middle values. Weighted quantiles interpolate on the cumulative weight
//! of the sorted sample.

use crate::error::{StatsError, StatsResult};

/// Compute sample quantiles, optionally weighted
///
/// Each entry of `q` must lie in `[0, 1]`. Non-finite samples (and their
/// weights) are ignored.
pub fn quantile(x: &[f64], q: &[f64], weights: Option<&[f64]>) -> StatsResult<Vec<f64>> {
    if let Some(&bad) = q.iter().find(|&&p| !(0.0..=1.0).contains(&p)) {
        return Err(StatsError::InvalidQuantile(bad));
    }

    match weights {
        None => {
            let mut sorted: Vec<f64> = x.iter().copied().filter(|v| v.is_finite()).collect();
            if sorted.is_empty() {
                return Err(StatsError::EmptySample);
            }
            sorted.sort_by(f64::total_cmp);
            Ok(q.iter().map(|&p| percentile_sorted(&sorted, p)).collect())
        }
        Some(w) => {
            if w.len() != x.len() {
                return Err(StatsError::LengthMismatch {
                    what: "weights",
                    expected: x.len(),
                    actual: w.len(),
                });
            }
            weighted_quantile(x, q, w)
        }
    }
}

/// Linear-interpolation percentile of an already sorted, non-empty slice
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = p * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn weighted_quantile(x: &[f64], q: &[f64], w: &[f64]) -> StatsResult<Vec<f64>> {
    let mut pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(w)
        .filter(|(v, wt)| v.is_finite() && wt.is_finite())
        .map(|(&v, &wt)| (v, wt))
        .collect();
    if pairs.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if pairs.len() == 1 {
        return Ok(vec![pairs[0].0; q.len()]);
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    // CDF over all but the last sample, normalized, with a leading zero
    let mut cdf = Vec::with_capacity(pairs.len());
    cdf.push(0.0);
    let mut acc = 0.0;
    for (_, wt) in &pairs[..pairs.len() - 1] {
        acc += wt;
        cdf.push(acc);
    }
    if acc <= 0.0 {
        return Err(StatsError::EmptySample);
    }
    for c in cdf.iter_mut().skip(1) {
        *c /= acc;
    }

    let values: Vec<f64> = pairs.iter().map(|(v, _)| *v).collect();
    Ok(q.iter().map(|&p| interp(p, &cdf, &values)).collect())
}

/// One-dimensional linear interpolation over increasing `xp`
///
/// Values outside `xp` clamp to the end points.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    if xp.is_empty() {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    let last = xp.len() - 1;
    if x >= xp[last] {
        return fp[last];
    }

    // First index with xp[idx] > x
    let idx = xp.partition_point(|&v| v <= x);
    let (x0, x1) = (xp[idx - 1], xp[idx]);
    let (f0, f1) = (fp[idx - 1], fp[idx]);
    if x1 == x0 {
        return f1;
    }
    f0 + (f1 - f0) * (x - x0) / (x1 - x0)
}

/// Central interval containing a fraction `mass` of the sample
///
/// Returns the `0.5 ± mass / 2` quantiles.
pub fn central_interval(x: &[f64], mass: f64, weights: Option<&[f64]>) -> StatsResult<(f64, f64)> {
    let q = quantile(x, &[0.5 - 0.5 * mass, 0.5 + 0.5 * mass], weights)?;
    Ok((q[0], q[1]))
}
