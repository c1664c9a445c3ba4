//! Corner plots
//!
//! Dimension `i` gets a 1D histogram on the diagonal and, below it, the
//! 2D histograms of every earlier dimension `j < i` against it. Panels
//! above the diagonal are hidden. With `reverse` the grid is mirrored so
//! the diagonal runs from bottom-left to top-right.

use cornerplot_stats::{central_interval, gaussian_filter1d, histogram, linear_edges, log_edges, quantile};
use tracing::{debug, info};

use crate::axis::{format_number, AxisPosition, Scale};
use crate::error::{validation, CornerError, CornerResult};
use crate::figure::{Axes, Figure, LineStyle, Marker, MarkerStyle, Title, TitlePlacement};
use crate::hist2d::{hist2d, Hist2dParams};
use crate::options::{CornerOptions, RangeSpec};
use crate::samples::Samples;

/// Make a new figure holding the corner plot of `samples`
pub fn corner(samples: &Samples, options: &CornerOptions) -> CornerResult<Figure> {
    let plan = Plan::resolve(samples, options)?;
    let mut figure = Figure::corner_grid(plan.k);
    plan.draw(&mut figure, options)?;
    Ok(figure)
}

/// Draw the corner plot of `samples` onto an existing `K × K` figure
///
/// Used to overlay several sample sets; each call adds its own artists
/// and resets the view limits to its own ranges.
pub fn corner_onto(figure: &mut Figure, samples: &Samples, options: &CornerOptions) -> CornerResult<()> {
    let plan = Plan::resolve(samples, options)?;
    figure.axes_grid(plan.k)?;
    plan.draw(figure, options)
}

/// Bin edges over the sorted `range`
pub(crate) fn bin_edges(range: (f64, f64), bins: usize, scale: Scale) -> CornerResult<Vec<f64>> {
    let (lo, hi) = (range.0.min(range.1), range.0.max(range.1));
    let edges = match scale {
        Scale::Linear => linear_edges(lo, hi, bins)?,
        Scale::Log => log_edges(lo, hi, bins)?,
    };
    Ok(edges)
}

/// Figure cell holding panel `(i, j)`
pub(crate) fn grid_position(k: usize, i: usize, j: usize, reverse: bool) -> (usize, usize) {
    if reverse {
        (k - i - 1, k - j - 1)
    } else {
        (i, j)
    }
}

/// Options resolved against a concrete sample set
struct Plan<'a> {
    k: usize,
    columns: Vec<Vec<f64>>,
    weights: Option<&'a [f64]>,
    ranges: Vec<(f64, f64)>,
    scales: Vec<Scale>,
    bins: Vec<usize>,
    hist_bins: Vec<usize>,
    labels: Option<Vec<String>>,
    titles: Option<Vec<String>>,
    truths: Option<Vec<Option<f64>>>,
    title_quantiles: Vec<f64>,
}

impl<'a> Plan<'a> {
    fn resolve(samples: &Samples, options: &'a CornerOptions) -> CornerResult<Self> {
        options.validate()?;
        let k = samples.ndim();
        let columns: Vec<Vec<f64>> = (0..k).map(|i| samples.column_vec(i)).collect();

        let weights = options.weights.as_deref();
        if let Some(w) = weights {
            if w.len() != samples.nsamples() {
                return Err(CornerError::InvalidConfig(format!(
                    "Lengths of weights must match number of samples ({} != {})",
                    w.len(),
                    samples.nsamples()
                )));
            }
        }

        let scales = options.axes_scale.resolve(k, "axes_scale")?;
        let ranges = resolve_ranges(samples, &columns, options.range.as_deref(), weights)?;

        let bad_log: Vec<String> = (0..k)
            .filter(|&i| scales[i].is_log() && ranges[i].0.min(ranges[i].1) <= 0.0)
            .map(|i| i.to_string())
            .collect();
        if !bad_log.is_empty() {
            return Err(CornerError::InvalidConfig(format!(
                "Logarithmic axes need a positive range; column(s) {} include non-positive values",
                bad_log.join(", ")
            )));
        }

        let bins = options.bins.resolve(k, "bins")?;
        let factors = options.hist_bin_factor.resolve(k, "hist_bin_factor")?;
        let hist_bins = bins
            .iter()
            .zip(&factors)
            .map(|(&b, &f)| ((f * b as f64).round() as usize).max(1))
            .collect();

        let labels = options
            .labels
            .clone()
            .or_else(|| samples.labels().map(<[String]>::to_vec));
        if let Some(l) = &labels {
            validation::validate_len("labels", l.len(), k)?;
        }
        let titles = options.titles.clone().or_else(|| labels.clone());
        if let Some(t) = &titles {
            validation::validate_len("titles", t.len(), k)?;
        }
        if let Some(t) = &options.truths {
            validation::validate_len("truths", t.len(), k)?;
        }

        Ok(Self {
            k,
            columns,
            weights,
            ranges,
            scales,
            bins,
            hist_bins,
            labels,
            titles,
            truths: options.truths.clone(),
            title_quantiles: options.resolved_title_quantiles(),
        })
    }

    fn truth(&self, i: usize) -> Option<f64> {
        self.truths.as_ref().and_then(|t| t[i])
    }

    fn label(&self, i: usize) -> Option<&str> {
        self.labels.as_ref().map(|l| l[i].as_str())
    }

    fn draw(&self, figure: &mut Figure, options: &CornerOptions) -> CornerResult<()> {
        let k = self.k;
        debug!(k, reverse = options.reverse, "drawing corner plot");

        for i in 0..k {
            for j in 0..k {
                let (row, col) = grid_position(k, i, j, options.reverse);
                let ax = figure.grid_cell_mut(k, row, col)?;
                if j > i {
                    ax.hide();
                } else if j == i {
                    self.draw_diagonal(ax, i, options)?;
                } else {
                    self.draw_pair(ax, i, j, options)?;
                }
            }
        }
        Ok(())
    }

    fn draw_diagonal(&self, ax: &mut Axes, i: usize, options: &CornerOptions) -> CornerResult<()> {
        let x = &self.columns[i];
        let style = LineStyle::new(options.color);

        ax.set_xscale(self.scales[i]);
        let edges = bin_edges(self.ranges[i], self.hist_bins[i], self.scales[i])?;
        let counts = histogram(x, &edges, self.weights)?;

        let peak = match options.smooth1d {
            None => {
                let peak = counts.iter().copied().fold(0.0, f64::max);
                ax.step_histogram(edges, counts, style);
                peak
            }
            Some(sigma) => {
                let smoothed = gaussian_filter1d(&counts, sigma);
                let peak = smoothed.iter().copied().fold(0.0, f64::max);
                let (xs, ys) = stepped(&edges, &smoothed);
                ax.plot(xs, ys, style);
                peak
            }
        };

        if let Some(t) = self.truth(i) {
            ax.axvline(t, LineStyle::new(options.truth_color));
        }

        if !options.quantiles.is_empty() {
            let values = quantile(x, &options.quantiles, self.weights)?;
            for &q in &values {
                ax.axvline(q, style.dashed());
            }
            if options.verbose {
                let pairs: Vec<(f64, f64)> =
                    options.quantiles.iter().copied().zip(values).collect();
                info!(dimension = i, quantiles = ?pairs, "Quantiles");
            }
        }

        if options.show_titles {
            if let Some(title) = self.title(i, options)? {
                let placement = if options.reverse {
                    TitlePlacement::Below
                } else {
                    TitlePlacement::Above
                };
                ax.set_title(title.placed(placement));
            }
        }

        let peak = if peak > 0.0 { peak } else { 1.0 };
        if options.scale_hist {
            ax.set_ylim(-0.1 * peak, 1.1 * peak);
        } else {
            ax.set_ylim(0.0, 1.1 * peak);
        }
        ax.set_xlim(self.ranges[i].0, self.ranges[i].1);

        ax.y.show_ticks = false;
        ax.y.show_tick_labels = false;
        ax.x.max_n_ticks = options.max_n_ticks;
        ax.x.prune_lower = true;

        if i < self.k - 1 {
            if options.top_ticks {
                ax.x.position = AxisPosition::Top;
            } else {
                ax.x.show_tick_labels = false;
            }
        } else {
            ax.x.position = if options.reverse {
                AxisPosition::Top
            } else {
                AxisPosition::Bottom
            };
            if let Some(label) = self.label(i) {
                ax.set_xlabel(label);
            }
        }
        Ok(())
    }

    fn title(&self, i: usize, options: &CornerOptions) -> CornerResult<Option<Title>> {
        let name = self.titles.as_ref().map(|t| t[i].clone());
        let Some(fmt) = options.title_format() else {
            return Ok(name.map(Title::text));
        };

        let q = quantile(&self.columns[i], &self.title_quantiles, self.weights)?;
        let (lo, mid, hi) = (q[0], q[1], q[2]);
        let render = |v: f64| {
            format_number(v, fmt).ok_or_else(|| {
                CornerError::InvalidConfig(format!("unsupported title_fmt '{}'", fmt))
            })
        };
        Ok(Some(Title::summary(
            name,
            render(mid)?,
            render(mid - lo)?,
            render(hi - mid)?,
        )))
    }

    fn draw_pair(&self, ax: &mut Axes, i: usize, j: usize, options: &CornerOptions) -> CornerResult<()> {
        let params = Hist2dParams {
            range: [self.ranges[j], self.ranges[i]],
            scale: [self.scales[j], self.scales[i]],
            bins: [self.bins[j], self.bins[i]],
            weights: self.weights,
            color: options.color,
            smooth: options.smooth,
            options: &options.hist2d,
        };
        hist2d(ax, &self.columns[j], &self.columns[i], &params)?;

        let truth_style = LineStyle::new(options.truth_color);
        if let (Some(tx), Some(ty)) = (self.truth(j), self.truth(i)) {
            ax.scatter(
                vec![tx],
                vec![ty],
                MarkerStyle::new(options.truth_color, Marker::Square),
            );
        }
        if let Some(tx) = self.truth(j) {
            ax.axvline(tx, truth_style);
        }
        if let Some(ty) = self.truth(i) {
            ax.axhline(ty, truth_style);
        }

        for axis in [&mut ax.x, &mut ax.y] {
            axis.max_n_ticks = options.max_n_ticks;
            axis.prune_lower = true;
        }

        if i < self.k - 1 {
            ax.x.show_tick_labels = false;
        } else {
            ax.x.position = if options.reverse {
                AxisPosition::Top
            } else {
                AxisPosition::Bottom
            };
            if let Some(label) = self.label(j) {
                ax.set_xlabel(label);
            }
        }

        if j > 0 {
            ax.y.show_tick_labels = false;
        } else {
            ax.y.position = if options.reverse {
                AxisPosition::Right
            } else {
                AxisPosition::Left
            };
            if let Some(label) = self.label(i) {
                ax.set_ylabel(label);
            }
        }
        Ok(())
    }
}

fn resolve_ranges(
    samples: &Samples,
    columns: &[Vec<f64>],
    specs: Option<&[RangeSpec]>,
    weights: Option<&[f64]>,
) -> CornerResult<Vec<(f64, f64)>> {
    let k = columns.len();
    let ranges: Vec<(f64, f64)> = match specs {
        None => (0..k)
            .map(|i| {
                let stats = samples.summary(i);
                (stats.min, stats.max)
            })
            .collect(),
        Some(specs) => {
            validation::validate_len("range", specs.len(), k)?;
            specs
                .iter()
                .zip(columns)
                .map(|(spec, x)| -> CornerResult<(f64, f64)> {
                    match *spec {
                        RangeSpec::Bounds([lo, hi]) => Ok((lo, hi)),
                        RangeSpec::Fraction(q) => Ok(central_interval(x, q, weights)?),
                    }
                })
                .collect::<CornerResult<_>>()?
        }
    };

    let flat: Vec<String> = ranges
        .iter()
        .enumerate()
        .filter(|(_, (lo, hi))| !(lo.is_finite() && hi.is_finite() && lo != hi))
        .map(|(i, _)| i.to_string())
        .collect();
    if !flat.is_empty() {
        return Err(CornerError::InvalidConfig(format!(
            "It looks like the parameter(s) in column(s) {} have no dynamic range. \
             Please provide a `range` argument.",
            flat.join(", ")
        )));
    }
    Ok(ranges)
}

/// Outline of a histogram as a polyline through both edges of every bin
fn stepped(edges: &[f64], counts: &[f64]) -> (Vec<f64>, Vec<f64>) {
    edges
        .windows(2)
        .zip(counts)
        .flat_map(|(w, &c)| [(w[0], c), (w[1], c)])
        .unzip()
}
