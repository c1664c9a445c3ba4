//! Histogram binning
//!
//! Bins are half-open `[e_i, e_{i+1})` except the last, which also includes
//! its right edge. Samples outside the outer edges and non-finite samples
//! are dropped.

use ndarray::Array2;

use crate::error::{StatsError, StatsResult};

/// `n + 1` evenly spaced edges from `lo` to `hi`
pub fn linear_edges(lo: f64, hi: f64, n: usize) -> StatsResult<Vec<f64>> {
    check_edge_request(lo, hi, n)?;
    let step = (hi - lo) / n as f64;
    let mut edges: Vec<f64> = (0..=n).map(|i| lo + step * i as f64).collect();
    edges[n] = hi;
    Ok(edges)
}

/// `n + 1` edges evenly spaced in log10 from `lo` to `hi`
pub fn log_edges(lo: f64, hi: f64, n: usize) -> StatsResult<Vec<f64>> {
    if lo <= 0.0 || hi <= 0.0 {
        return Err(StatsError::InvalidEdges(format!(
            "logarithmic bins need a positive range, got [{lo}, {hi}]"
        )));
    }
    let log_edges = linear_edges(lo.log10(), hi.log10(), n)?;
    let mut edges: Vec<f64> = log_edges.into_iter().map(|e| 10f64.powf(e)).collect();
    edges[0] = lo;
    edges[n] = hi;
    Ok(edges)
}

fn check_edge_request(lo: f64, hi: f64, n: usize) -> StatsResult<()> {
    if n == 0 {
        return Err(StatsError::InvalidEdges("at least one bin is required".to_string()));
    }
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(StatsError::InvalidEdges(format!(
            "range [{lo}, {hi}] must be finite and increasing"
        )));
    }
    Ok(())
}

/// Midpoints of consecutive edges (geometric midpoints when `geometric`)
pub fn bin_centers(edges: &[f64], geometric: bool) -> Vec<f64> {
    edges
        .windows(2)
        .map(|w| {
            if geometric {
                (w[0] * w[1]).sqrt()
            } else {
                0.5 * (w[0] + w[1])
            }
        })
        .collect()
}

/// Index of the bin containing `value`, if any
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let n = edges.len().checked_sub(1)?;
    if n == 0 || !value.is_finite() || value < edges[0] || value > edges[n] {
        return None;
    }
    if value == edges[n] {
        return Some(n - 1);
    }
    // First edge strictly greater than value, minus one
    Some(edges.partition_point(|&e| e <= value) - 1)
}

/// One-dimensional histogram (weighted when `weights` is given)
pub fn histogram(x: &[f64], edges: &[f64], weights: Option<&[f64]>) -> StatsResult<Vec<f64>> {
    check_weights(x.len(), weights)?;
    let nbins = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; nbins];

    for (i, &v) in x.iter().enumerate() {
        if let Some(b) = bin_index(edges, v) {
            counts[b] += weights.map_or(1.0, |w| w[i]);
        }
    }
    Ok(counts)
}

/// Two-dimensional histogram indexed `[ix, iy]`
pub fn histogram2d(
    x: &[f64],
    y: &[f64],
    x_edges: &[f64],
    y_edges: &[f64],
    weights: Option<&[f64]>,
) -> StatsResult<Array2<f64>> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            what: "y",
            expected: x.len(),
            actual: y.len(),
        });
    }
    check_weights(x.len(), weights)?;

    let nx = x_edges.len().saturating_sub(1);
    let ny = y_edges.len().saturating_sub(1);
    let mut grid = Array2::<f64>::zeros((nx, ny));

    for (i, (&xv, &yv)) in x.iter().zip(y).enumerate() {
        if let (Some(ix), Some(iy)) = (bin_index(x_edges, xv), bin_index(y_edges, yv)) {
            grid[[ix, iy]] += weights.map_or(1.0, |w| w[i]);
        }
    }
    Ok(grid)
}

fn check_weights(n: usize, weights: Option<&[f64]>) -> StatsResult<()> {
    match weights {
        Some(w) if w.len() != n => Err(StatsError::LengthMismatch {
            what: "weights",
            expected: n,
            actual: w.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_edges() {
        let edges = linear_edges(0.0, 1.0, 4).unwrap();
        assert_eq!(edges.len(), 5);
        assert!((edges[1] - 0.25).abs() < 1e-12);
        assert_eq!(edges[4], 1.0);
    }

    #[test]
    fn test_linear_edges_invalid() {
        assert!(linear_edges(1.0, 1.0, 4).is_err());
        assert!(linear_edges(0.0, 1.0, 0).is_err());
        assert!(linear_edges(2.0, 1.0, 3).is_err());
    }

    #[test]
    fn test_log_edges() {
        let edges = log_edges(1.0, 1000.0, 3).unwrap();
        assert_eq!(edges[0], 1.0);
        assert!((edges[1] - 10.0).abs() < 1e-9);
        assert!((edges[2] - 100.0).abs() < 1e-9);
        assert_eq!(edges[3], 1000.0);
        assert!(log_edges(-1.0, 10.0, 3).is_err());
    }

    #[test]
    fn test_bin_index_boundaries() {
        let edges = [0.0, 1.0, 2.0];
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 1.0), Some(1));
        assert_eq!(bin_index(&edges, 2.0), Some(1));
        assert_eq!(bin_index(&edges, 2.1), None);
        assert_eq!(bin_index(&edges, -0.1), None);
        assert_eq!(bin_index(&edges, f64::NAN), None);
    }

    #[test]
    fn test_histogram_counts() {
        let edges = linear_edges(0.0, 3.0, 3).unwrap();
        let counts = histogram(&[0.5, 1.5, 1.7, 2.9, 5.0], &edges, None).unwrap();
        assert_eq!(counts, vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_histogram_weighted() {
        let edges = linear_edges(0.0, 2.0, 2).unwrap();
        let counts = histogram(&[0.5, 1.5], &edges, Some(&[2.0, 0.5])).unwrap();
        assert_eq!(counts, vec![2.0, 0.5]);
        assert!(histogram(&[0.5, 1.5], &edges, Some(&[1.0])).is_err());
    }

    #[test]
    fn test_histogram2d() {
        let xe = linear_edges(0.0, 2.0, 2).unwrap();
        let ye = linear_edges(0.0, 2.0, 2).unwrap();
        let h = histogram2d(&[0.5, 1.5, 1.5], &[0.5, 0.5, 1.5], &xe, &ye, None).unwrap();
        assert_eq!(h[[0, 0]], 1.0);
        assert_eq!(h[[1, 0]], 1.0);
        assert_eq!(h[[1, 1]], 1.0);
        assert_eq!(h[[0, 1]], 0.0);
    }

    #[test]
    fn test_bin_centers() {
        let centers = bin_centers(&[1.0, 3.0, 5.0], false);
        assert_eq!(centers, vec![2.0, 4.0]);
        let geo = bin_centers(&[1.0, 100.0], true);
        assert!((geo[0] - 10.0).abs() < 1e-12);
    }
}
