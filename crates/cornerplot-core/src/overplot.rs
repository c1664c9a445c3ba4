//! Overlays on an existing corner figure

use crate::corner::grid_position;
use crate::error::{CornerError, CornerResult};
use crate::figure::{Figure, LineStyle, MarkerStyle};

/// Mark reference values on every panel
///
/// Diagonal panels get a vertical line at `xs[k]`; the 2D panel of
/// dimensions `k1 < k2` gets a vertical line at `xs[k1]` and a horizontal
/// line at `xs[k2]`. `None` entries are skipped.
pub fn overplot_lines(
    figure: &mut Figure,
    xs: &[Option<f64>],
    style: LineStyle,
    reverse: bool,
) -> CornerResult<()> {
    let k = xs.len();
    figure.axes_grid(k)?;

    for (k1, &x1) in xs.iter().enumerate() {
        if let Some(x1) = x1 {
            let (row, col) = grid_position(k, k1, k1, reverse);
            figure.grid_cell_mut(k, row, col)?.axvline(x1, style);
        }

        for (k2, &x2) in xs.iter().enumerate().skip(k1 + 1) {
            let (row, col) = grid_position(k, k2, k1, reverse);
            let ax = figure.grid_cell_mut(k, row, col)?;
            if let Some(x1) = x1 {
                ax.axvline(x1, style);
            }
            if let Some(x2) = x2 {
                ax.axhline(x2, style);
            }
        }
    }
    Ok(())
}

/// Plot points on every 2D panel
///
/// Each row is one point in `K` dimensions; the panel of dimensions
/// `k1 < k2` shows `(row[k1], row[k2])`.
pub fn overplot_points(
    figure: &mut Figure,
    points: &[Vec<f64>],
    style: MarkerStyle,
    reverse: bool,
) -> CornerResult<()> {
    let k = points
        .first()
        .map(Vec::len)
        .ok_or_else(|| CornerError::InvalidArgument("no points to plot".to_string()))?;
    if let Some(i) = points.iter().position(|p| p.len() != k) {
        return Err(CornerError::InvalidArgument(format!(
            "point {} has {} coordinates, expected {}",
            i,
            points[i].len(),
            k
        )));
    }
    figure.axes_grid(k)?;

    for k1 in 0..k {
        let xs: Vec<f64> = points.iter().map(|p| p[k1]).collect();
        for k2 in k1 + 1..k {
            let ys: Vec<f64> = points.iter().map(|p| p[k2]).collect();
            let (row, col) = grid_position(k, k2, k1, reverse);
            figure
                .grid_cell_mut(k, row, col)?
                .scatter(xs.clone(), ys, style);
        }
    }
    Ok(())
}
