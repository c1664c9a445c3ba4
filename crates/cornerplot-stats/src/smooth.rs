//! Gaussian smoothing of binned counts
//!
//! The kernel is truncated at four standard deviations and the input is
//! extended at its boundaries by reflection (`d c b a | a b c d | d c b a`).

use ndarray::{Array2, Axis};

const TRUNCATE: f64 = 4.0;

/// Normalized Gaussian weights for `sigma`, of length `2 * radius + 1`
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as usize;
    let two_s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-d * d / two_s2).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Reflect an out-of-range index back into `0..n`
fn reflect(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    i = i.rem_euclid(period);
    if i >= n {
        (period - 1 - i) as usize
    } else {
        i as usize
    }
}

/// Smooth a 1D sequence with a Gaussian of width `sigma` (in samples)
pub fn gaussian_filter1d(values: &[f64], sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 || !sigma.is_finite() || values.is_empty() {
        return values.to_vec();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let n = values.len();

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let src = reflect(i as isize + k as isize - radius, n);
                    w * values[src]
                })
                .sum()
        })
        .collect()
}

/// Smooth a 2D grid with a separable Gaussian of width `sigma` along both axes
pub fn gaussian_filter2d(grid: &Array2<f64>, sigma: f64) -> Array2<f64> {
    gaussian_filter2d_xy(grid, sigma, sigma)
}

/// Smooth a 2D grid with independent widths along axis 0 and axis 1
pub fn gaussian_filter2d_xy(grid: &Array2<f64>, sigma0: f64, sigma1: f64) -> Array2<f64> {
    let mut out = grid.clone();

    for mut lane in out.lanes_mut(Axis(0)) {
        let smoothed = gaussian_filter1d(&lane.to_vec(), sigma0);
        lane.iter_mut().zip(smoothed).for_each(|(v, s)| *v = s);
    }
    for mut lane in out.lanes_mut(Axis(1)) {
        let smoothed = gaussian_filter1d(&lane.to_vec(), sigma1);
        lane.iter_mut().zip(smoothed).for_each(|(v, s)| *v = s);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized() {
        let k = gaussian_kernel(1.0);
        assert_eq!(k.len(), 9);
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(k[4] > k[3] && k[3] > k[2]);
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
    }

    #[test]
    fn test_filter_preserves_constant() {
        let values = vec![3.0; 10];
        let smoothed = gaussian_filter1d(&values, 1.5);
        for v in smoothed {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_filter_preserves_mass() {
        let mut values = vec![0.0; 21];
        values[10] = 1.0;
        let smoothed = gaussian_filter1d(&values, 1.0);
        let total: f64 = smoothed.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(smoothed[10] < 1.0);
        assert!(smoothed[9] > 0.0);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let values = vec![1.0, 5.0, 2.0];
        assert_eq!(gaussian_filter1d(&values, 0.0), values);
    }

    #[test]
    fn test_filter2d_spreads_both_axes() {
        let mut grid = Array2::<f64>::zeros((7, 7));
        grid[[3, 3]] = 1.0;
        let smoothed = gaussian_filter2d(&grid, 1.0);
        assert!(smoothed[[2, 3]] > 0.0);
        assert!(smoothed[[3, 2]] > 0.0);
        assert!((smoothed[[2, 3]] - smoothed[[3, 2]]).abs() < 1e-12);
        assert!((smoothed.sum() - 1.0).abs() < 1e-9);
    }
}
