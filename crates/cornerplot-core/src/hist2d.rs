//! Two-dimensional histogram panels
//!
//! Draws, in order: the raw samples, a white mask under the outermost
//! contour, the density shading (or filled contour bands) and finally the
//! credible contours themselves.

use cornerplot_stats::{credible_levels, default_levels, gaussian_filter2d, histogram2d};
use ndarray::{s, Array2};
use tracing::{debug, warn};

use crate::axis::Scale;
use crate::color::{contour_fill_colors, density_colormap, Color};
use crate::contour::{contour_bands, contour_lines, Segment};
use crate::corner::bin_edges;
use crate::error::CornerResult;
use crate::figure::{Axes, FilledBand, LineStyle, Marker, MarkerStyle};
use crate::options::Hist2dOptions;

/// Per-panel inputs resolved by the caller
#[derive(Clone, Copy, Debug)]
pub struct Hist2dParams<'a> {
    /// `(lo, hi)` for x and y; `lo > hi` flips that axis
    pub range: [(f64, f64); 2],
    pub scale: [Scale; 2],
    pub bins: [usize; 2],
    pub weights: Option<&'a [f64]>,
    pub color: Color,
    /// Gaussian σ in bins
    pub smooth: Option<f64>,
    pub options: &'a Hist2dOptions,
}

/// Plot a 2D histogram of `x` against `y` onto `ax`
pub fn hist2d(ax: &mut Axes, x: &[f64], y: &[f64], params: &Hist2dParams<'_>) -> CornerResult<()> {
    let opts = params.options;
    let [x_scale, y_scale] = params.scale;
    ax.set_xscale(x_scale);
    ax.set_yscale(y_scale);

    let x_edges = bin_edges(params.range[0], params.bins[0], x_scale)?;
    let y_edges = bin_edges(params.range[1], params.bins[1], y_scale)?;

    let mut h = histogram2d(x, y, &x_edges, &y_edges, params.weights)?;
    if let Some(sigma) = params.smooth {
        h = gaussian_filter2d(&h, sigma);
    }

    let masses = opts.levels.clone().unwrap_or_else(default_levels);
    let levels = credible_levels(&h, &masses)?;
    if levels.degenerate {
        warn!("Too few points to create valid contours");
    }
    let h_min = h.iter().copied().fold(f64::INFINITY, f64::min);
    let h_max = h.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let outer = levels.min().unwrap_or(h_min);
    let thresholds = levels.values;

    debug!(
        nx = params.bins[0],
        ny = params.bins[1],
        h_max,
        ?thresholds,
        "binned 2d histogram"
    );

    // Contours are traced in axis space so log axes get straight edges
    let x2 = padded_centers(&x_edges, x_scale);
    let y2 = padded_centers(&y_edges, y_scale);
    let h2 = padded_grid(&h, h_min);
    let to_data = |(tx, ty): (f64, f64)| (x_scale.inverse(tx), y_scale.inverse(ty));
    let to_data_polys = |polys: Vec<Vec<(f64, f64)>>| -> Vec<Vec<(f64, f64)>> {
        polys
            .into_iter()
            .map(|p| p.into_iter().map(to_data).collect())
            .collect()
    };

    if opts.plot_datapoints {
        ax.scatter(
            x.to_vec(),
            y.to_vec(),
            MarkerStyle::new(params.color.with_alpha(opts.data_alpha), Marker::Circle)
                .with_size(opts.data_marker_size),
        );
    }

    if (opts.plot_contours || opts.plot_density) && !opts.no_fill_contours {
        let mask = contour_bands(&x2, &y2, &h2, outer, h_max)?;
        ax.contourf(vec![FilledBand {
            polygons: to_data_polys(mask),
            color: Color::WHITE,
        }]);
    }

    if opts.plot_contours && opts.fill_contours {
        let colors = contour_fill_colors(params.color, thresholds.len());
        let mut bounds = Vec::with_capacity(thresholds.len() + 2);
        bounds.push(0.0);
        bounds.extend_from_slice(&thresholds);
        bounds.push(h_max * (1.0 + 1e-4));

        let mut bands = Vec::new();
        for (pair, color) in bounds.windows(2).zip(colors) {
            if color.is_transparent() {
                continue;
            }
            let polygons = contour_bands(&x2, &y2, &h2, pair[0], pair[1])?;
            bands.push(FilledBand {
                polygons: to_data_polys(polygons),
                color,
            });
        }
        ax.contourf(bands);
    } else if opts.plot_density {
        let cmap = density_colormap(params.color);
        let span = h_max - h_min;
        let colors = h
            .iter()
            .map(|&v| {
                let t = if span > 0.0 { (h_max - v) / span } else { 0.0 };
                cmap.sample(t as f32)
            })
            .collect();
        ax.pcolor(x_edges.clone(), y_edges.clone(), colors);
    }

    if opts.plot_contours {
        let mut segments: Vec<Segment> = Vec::new();
        for &level in &thresholds {
            segments.extend(
                contour_lines(&x2, &y2, &h2, level)?
                    .into_iter()
                    .map(|[a, b]| [to_data(a), to_data(b)]),
            );
        }
        ax.contour(
            segments,
            LineStyle::new(params.color).with_width(opts.contour_line_width),
        );
    }

    ax.set_xlim(params.range[0].0, params.range[0].1);
    ax.set_ylim(params.range[1].0, params.range[1].1);
    Ok(())
}

/// Bin centres in axis space, extended by two extrapolated bins per side
fn padded_centers(edges: &[f64], scale: Scale) -> Vec<f64> {
    let t: Vec<f64> = edges.iter().map(|&e| scale.forward(e)).collect();
    let centers: Vec<f64> = t.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    let n = centers.len();

    let (first_step, last_step) = if n > 1 {
        (centers[1] - centers[0], centers[n - 1] - centers[n - 2])
    } else {
        let width = t[1] - t[0];
        (width, width)
    };

    let mut padded = Vec::with_capacity(n + 4);
    padded.push(centers[0] - 2.0 * first_step);
    padded.push(centers[0] - first_step);
    padded.extend_from_slice(&centers);
    padded.push(centers[n - 1] + last_step);
    padded.push(centers[n - 1] + 2.0 * last_step);
    padded
}

/// Histogram embedded in a two-cell border: the inner ring repeats the
/// edge bins, the outer ring holds `fill`
fn padded_grid(h: &Array2<f64>, fill: f64) -> Array2<f64> {
    let (nx, ny) = h.dim();
    let mut h2 = Array2::from_elem((nx + 4, ny + 4), fill);

    h2.slice_mut(s![2..nx + 2, 2..ny + 2]).assign(h);
    h2.slice_mut(s![2..nx + 2, 1]).assign(&h.column(0));
    h2.slice_mut(s![2..nx + 2, ny + 2]).assign(&h.column(ny - 1));
    h2.slice_mut(s![1, 2..ny + 2]).assign(&h.row(0));
    h2.slice_mut(s![nx + 2, 2..ny + 2]).assign(&h.row(nx - 1));
    h2[[1, 1]] = h[[0, 0]];
    h2[[1, ny + 2]] = h[[0, ny - 1]];
    h2[[nx + 2, 1]] = h[[nx - 1, 0]];
    h2[[nx + 2, ny + 2]] = h[[nx - 1, ny - 1]];
    h2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Artist;
    use cornerplot_stats::StatsError;

    use crate::error::CornerError;

    /// Deterministic, peaked 2D sample
    fn sample(n: usize) -> (Vec<f64>, Vec<f64>) {
        (0..n)
            .map(|i| {
                let u = (i as f64 * 0.618_033_988_7).fract();
                let v = (i as f64 * 0.414_213_562_3).fract();
                (u + v - 1.0, u - v)
            })
            .unzip()
    }

    fn params(options: &Hist2dOptions) -> Hist2dParams<'_> {
        Hist2dParams {
            range: [(-1.0, 1.0), (-1.0, 1.0)],
            scale: [Scale::Linear, Scale::Linear],
            bins: [20, 20],
            weights: None,
            color: Color::BLACK,
            smooth: None,
            options,
        }
    }

    fn kinds(ax: &Axes) -> Vec<&'static str> {
        ax.artists().iter().map(Artist::kind).collect()
    }

    #[test]
    fn test_default_draw_order() {
        let (x, y) = sample(4000);
        let opts = Hist2dOptions::default();
        let mut ax = Axes::new();
        hist2d(&mut ax, &x, &y, &params(&opts)).unwrap();

        assert_eq!(kinds(&ax), vec!["markers", "contourf", "mesh", "contour"]);
        assert_eq!(ax.x.limits, Some((-1.0, 1.0)));
        assert_eq!(ax.y.limits, Some((-1.0, 1.0)));

        match &ax.artists()[3] {
            Artist::ContourLines { segments, .. } => assert!(!segments.is_empty()),
            other => panic!("expected contour lines, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_filled_contours() {
        let (x, y) = sample(4000);
        let opts = Hist2dOptions {
            fill_contours: true,
            ..Default::default()
        };
        let mut ax = Axes::new();
        hist2d(&mut ax, &x, &y, &params(&opts)).unwrap();

        assert_eq!(kinds(&ax), vec!["markers", "contourf", "contourf", "contour"]);
        match &ax.artists()[2] {
            Artist::Bands { bands } => {
                // Four levels give five bands, the outermost is transparent
                assert_eq!(bands.len(), 4);
                assert!(bands.windows(2).all(|w| w[0].color.a < w[1].color.a));
            }
            other => panic!("expected bands, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_minimal_panel() {
        let (x, y) = sample(2000);
        let opts = Hist2dOptions {
            plot_datapoints: false,
            no_fill_contours: true,
            plot_density: false,
            ..Default::default()
        };
        let mut ax = Axes::new();
        hist2d(&mut ax, &x, &y, &params(&opts)).unwrap();
        assert_eq!(kinds(&ax), vec!["contour"]);
    }

    #[test]
    fn test_reversed_range_keeps_orientation() {
        let (x, y) = sample(2000);
        let opts = Hist2dOptions::default();
        let mut p = params(&opts);
        p.range = [(1.0, -1.0), (-1.0, 1.0)];
        p.smooth = Some(1.0);

        let mut ax = Axes::new();
        hist2d(&mut ax, &x, &y, &p).unwrap();
        assert_eq!(ax.x.limits, Some((1.0, -1.0)));
    }

    #[test]
    fn test_empty_range_is_an_error() {
        let (x, y) = sample(100);
        let opts = Hist2dOptions::default();
        let mut p = params(&opts);
        p.range = [(10.0, 11.0), (10.0, 11.0)];

        let err = hist2d(&mut Axes::new(), &x, &y, &p).unwrap_err();
        assert!(matches!(err, CornerError::Stats(StatsError::EmptyHistogram)));
    }

    #[test]
    fn test_padding() {
        let centers = padded_centers(&[0.0, 1.0, 2.0, 3.0], Scale::Linear);
        assert_eq!(centers, vec![-1.5, -0.5, 0.5, 1.5, 2.5, 3.5, 4.5]);

        let log = padded_centers(&[1.0, 10.0, 100.0], Scale::Log);
        assert_eq!(log, vec![-1.5, -0.5, 0.5, 1.5, 2.5, 3.5]);

        let h = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let h2 = padded_grid(&h, 0.0);
        assert_eq!(h2.dim(), (6, 6));
        assert_eq!(h2[[2, 2]], 1.0);
        assert_eq!(h2[[1, 1]], 1.0);
        assert_eq!(h2[[4, 1]], 3.0);
        assert_eq!(h2[[1, 4]], 2.0);
        assert_eq!(h2[[4, 4]], 4.0);
        assert_eq!(h2[[0, 0]], 0.0);
        assert_eq!(h2[[5, 3]], 0.0);
    }
}
