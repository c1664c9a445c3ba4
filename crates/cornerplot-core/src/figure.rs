//! Figure and axes model
//!
//! A [`Figure`] is a grid of [`Axes`], each holding a draw list of
//! [`Artist`]s in data coordinates. Nothing is rasterised here; the
//! renderer walks the scene and maps it to pixels with [`AxesTransform`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::axis::{AxisPosition, AxisState, Scale};
use crate::color::Color;
use crate::error::{CornerError, CornerResult};

/// Size of the corner grid cells, in inches
const CORNER_FACTOR: f64 = 2.0;
/// Margin for labels on the left and bottom, in units of `CORNER_FACTOR`
const CORNER_LBDIM: f64 = 0.5;
/// Margin on the top and right, in units of `CORNER_FACTOR`
const CORNER_TRDIM: f64 = 0.2;
/// Gap between panels as a fraction of a panel
const CORNER_WHSPACE: f64 = 0.05;

/// Placement of the axes grid inside the figure, as figure fractions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubplotLayout {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    /// Horizontal gap as a fraction of the axes width
    pub wspace: f64,
    /// Vertical gap as a fraction of the axes height
    pub hspace: f64,
}

impl Default for SubplotLayout {
    fn default() -> Self {
        Self {
            left: 0.125,
            bottom: 0.11,
            right: 0.9,
            top: 0.88,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

/// Pixel rectangle, origin at the top-left corner of the image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// Solid or dashed stroke
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
}

/// Stroke style for lines, in points
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: LineDash,
}

impl LineStyle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            width: 1.5,
            dash: LineDash::Solid,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dash = LineDash::Dashed;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

/// Marker shapes, named by their usual one-character codes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    #[default]
    #[serde(rename = "o")]
    Circle,
    #[serde(rename = "s")]
    Square,
    #[serde(rename = "^")]
    Triangle,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "x")]
    Cross,
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "o" | "." => Ok(Marker::Circle),
            "s" => Ok(Marker::Square),
            "^" => Ok(Marker::Triangle),
            "+" => Ok(Marker::Plus),
            "x" => Ok(Marker::Cross),
            other => Err(format!("unknown marker '{}'", other)),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Marker::Circle => "o",
            Marker::Square => "s",
            Marker::Triangle => "^",
            Marker::Plus => "+",
            Marker::Cross => "x",
        };
        f.write_str(code)
    }
}

/// Marker style; `size` is the marker diameter in points
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Color,
    pub marker: Marker,
    pub size: f64,
}

impl MarkerStyle {
    pub fn new(color: Color, marker: Marker) -> Self {
        Self {
            color,
            marker,
            size: 6.0,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Polygons sharing one fill color
#[derive(Clone, Debug, PartialEq)]
pub struct FilledBand {
    pub polygons: Vec<Vec<(f64, f64)>>,
    pub color: Color,
}

/// Something drawn inside an axes, in data coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum Artist {
    /// Histogram outline: `edges.len() == counts.len() + 1`
    Step {
        edges: Vec<f64>,
        counts: Vec<f64>,
        style: LineStyle,
    },
    Line {
        xs: Vec<f64>,
        ys: Vec<f64>,
        style: LineStyle,
    },
    /// Line spanning the whole axes at a fixed x (vertical) or y (horizontal)
    AxLine {
        orientation: Orientation,
        value: f64,
        style: LineStyle,
    },
    Markers {
        xs: Vec<f64>,
        ys: Vec<f64>,
        style: MarkerStyle,
    },
    ContourLines {
        segments: Vec<[(f64, f64); 2]>,
        style: LineStyle,
    },
    Bands {
        bands: Vec<FilledBand>,
    },
    /// Colored cells; `colors[ix * ny + iy]` with `ny = y_edges.len() - 1`
    Mesh {
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
        colors: Vec<Color>,
    },
}

impl Artist {
    /// Short name used in logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Artist::Step { .. } => "step",
            Artist::Line { .. } => "line",
            Artist::AxLine { .. } => "axline",
            Artist::Markers { .. } => "markers",
            Artist::ContourLines { .. } => "contour",
            Artist::Bands { .. } => "contourf",
            Artist::Mesh { .. } => "mesh",
        }
    }

    /// Points contributing to autoscaling, as (x, y) with either side optional
    fn extent_points(&self) -> Vec<(Option<f64>, Option<f64>)> {
        match self {
            Artist::Step { edges, counts, .. } => {
                let mut pts: Vec<_> = edges.iter().map(|&e| (Some(e), None)).collect();
                pts.push((None, Some(0.0)));
                pts.extend(counts.iter().map(|&c| (None, Some(c))));
                pts
            }
            Artist::Line { xs, ys, .. } | Artist::Markers { xs, ys, .. } => xs
                .iter()
                .zip(ys)
                .map(|(&x, &y)| (Some(x), Some(y)))
                .collect(),
            Artist::AxLine {
                orientation: Orientation::Vertical,
                value,
                ..
            } => vec![(Some(*value), None)],
            Artist::AxLine { value, .. } => vec![(None, Some(*value))],
            Artist::ContourLines { segments, .. } => segments
                .iter()
                .flatten()
                .map(|&(x, y)| (Some(x), Some(y)))
                .collect(),
            Artist::Bands { bands } => bands
                .iter()
                .flat_map(|b| b.polygons.iter().flatten())
                .map(|&(x, y)| (Some(x), Some(y)))
                .collect(),
            Artist::Mesh {
                x_edges, y_edges, ..
            } => x_edges
                .iter()
                .map(|&x| (Some(x), None))
                .chain(y_edges.iter().map(|&y| (None, Some(y))))
                .collect(),
        }
    }
}

/// Title of an axes, either free text or a quantile summary
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Title {
    pub label: Option<String>,
    /// `(median, minus, plus)` already formatted
    pub summary: Option<(String, String, String)>,
    pub placement: TitlePlacement,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitlePlacement {
    #[default]
    Above,
    Below,
}

impl Title {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            label: Some(text.into()),
            summary: None,
            placement: TitlePlacement::Above,
        }
    }

    pub fn summary(
        label: Option<String>,
        median: impl Into<String>,
        minus: impl Into<String>,
        plus: impl Into<String>,
    ) -> Self {
        Self {
            label,
            summary: Some((median.into(), minus.into(), plus.into())),
            placement: TitlePlacement::Above,
        }
    }

    pub fn placed(mut self, placement: TitlePlacement) -> Self {
        self.placement = placement;
        self
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.summary) {
            (Some(label), Some((mid, minus, plus))) => {
                write!(f, "{} = {}_{{-{}}}^{{+{}}}", label, mid, minus, plus)
            }
            (None, Some((mid, minus, plus))) => write!(f, "{}_{{-{}}}^{{+{}}}", mid, minus, plus),
            (Some(label), None) => f.write_str(label),
            (None, None) => Ok(()),
        }
    }
}

/// One panel of a figure
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub x: AxisState,
    pub y: AxisState,
    pub title: Option<Title>,
    /// Hidden axes draw neither frame, ticks nor artists
    pub visible: bool,
    artists: Vec<Artist>,
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    pub fn new() -> Self {
        Self {
            x: AxisState::new(AxisPosition::Bottom),
            y: AxisState::new(AxisPosition::Left),
            title: None,
            visible: true,
            artists: Vec::new(),
        }
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn add_artist(&mut self, artist: Artist) {
        self.artists.push(artist);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.x.limits = Some((lo, hi));
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.y.limits = Some((lo, hi));
    }

    pub fn set_xscale(&mut self, scale: Scale) {
        self.x.scale = scale;
    }

    pub fn set_yscale(&mut self, scale: Scale) {
        self.y.scale = scale;
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.x.label = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.y.label = Some(label.into());
    }

    pub fn set_title(&mut self, title: Title) {
        self.title = Some(title);
    }

    pub fn axvline(&mut self, x: f64, style: LineStyle) {
        self.artists.push(Artist::AxLine {
            orientation: Orientation::Vertical,
            value: x,
            style,
        });
    }

    pub fn axhline(&mut self, y: f64, style: LineStyle) {
        self.artists.push(Artist::AxLine {
            orientation: Orientation::Horizontal,
            value: y,
            style,
        });
    }

    pub fn plot(&mut self, xs: Vec<f64>, ys: Vec<f64>, style: LineStyle) {
        self.artists.push(Artist::Line { xs, ys, style });
    }

    pub fn scatter(&mut self, xs: Vec<f64>, ys: Vec<f64>, style: MarkerStyle) {
        self.artists.push(Artist::Markers { xs, ys, style });
    }

    pub fn step_histogram(&mut self, edges: Vec<f64>, counts: Vec<f64>, style: LineStyle) {
        self.artists.push(Artist::Step {
            edges,
            counts,
            style,
        });
    }

    pub fn contour(&mut self, segments: Vec<[(f64, f64); 2]>, style: LineStyle) {
        self.artists.push(Artist::ContourLines { segments, style });
    }

    pub fn contourf(&mut self, bands: Vec<FilledBand>) {
        self.artists.push(Artist::Bands { bands });
    }

    pub fn pcolor(&mut self, x_edges: Vec<f64>, y_edges: Vec<f64>, colors: Vec<Color>) {
        self.artists.push(Artist::Mesh {
            x_edges,
            y_edges,
            colors,
        });
    }

    /// Explicit x limits, or limits fitted to the artists
    pub fn view_xlim(&self) -> (f64, f64) {
        self.x
            .limits
            .unwrap_or_else(|| self.autoscale(self.x.scale, |p| p.0))
    }

    /// Explicit y limits, or limits fitted to the artists
    pub fn view_ylim(&self) -> (f64, f64) {
        self.y
            .limits
            .unwrap_or_else(|| self.autoscale(self.y.scale, |p| p.1))
    }

    fn autoscale(
        &self,
        scale: Scale,
        pick: impl Fn((Option<f64>, Option<f64>)) -> Option<f64>,
    ) -> (f64, f64) {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in self
            .artists
            .iter()
            .flat_map(Artist::extent_points)
            .filter_map(&pick)
            .filter(|v| v.is_finite() && (!scale.is_log() || *v > 0.0))
        {
            let t = scale.forward(v);
            lo = lo.min(t);
            hi = hi.max(t);
        }

        if !lo.is_finite() {
            return match scale {
                Scale::Linear => (0.0, 1.0),
                Scale::Log => (1.0, 10.0),
            };
        }
        let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 };
        (scale.inverse(lo - pad), scale.inverse(hi + pad))
    }
}

/// A grid of axes plus the physical figure size
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    /// Width in inches
    pub width: f64,
    /// Height in inches
    pub height: f64,
    pub layout: SubplotLayout,
    nrows: usize,
    ncols: usize,
    axes: Vec<Axes>,
}

impl Figure {
    /// Figure with an `nrows × ncols` grid of empty axes
    pub fn new(nrows: usize, ncols: usize, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layout: SubplotLayout::default(),
            nrows,
            ncols,
            axes: (0..nrows * ncols).map(|_| Axes::new()).collect(),
        }
    }

    /// Square `k × k` figure sized and spaced for a corner plot
    pub fn corner_grid(k: usize) -> Self {
        let lbdim = CORNER_LBDIM * CORNER_FACTOR;
        let trdim = CORNER_TRDIM * CORNER_FACTOR;
        let plotdim =
            CORNER_FACTOR * k as f64 + CORNER_FACTOR * (k as f64 - 1.0).max(0.0) * CORNER_WHSPACE;
        let dim = lbdim + plotdim + trdim;
        debug!(k, dim, "creating corner figure");

        let mut figure = Self::new(k, k, dim, dim);
        let lb = lbdim / dim;
        let tr = (lbdim + plotdim) / dim;
        figure.layout = SubplotLayout {
            left: lb,
            bottom: lb,
            right: tr,
            top: tr,
            wspace: CORNER_WHSPACE,
            hspace: CORNER_WHSPACE,
        };
        figure
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self, row: usize, col: usize) -> Option<&Axes> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.axes.get(row * self.ncols + col)
    }

    pub fn axes_mut(&mut self, row: usize, col: usize) -> Option<&mut Axes> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.axes.get_mut(row * self.ncols + col)
    }

    /// All axes in row-major order with their grid position
    pub fn iter_axes(&self) -> impl Iterator<Item = ((usize, usize), &Axes)> {
        let ncols = self.ncols.max(1);
        self.axes
            .iter()
            .enumerate()
            .map(move |(i, ax)| ((i / ncols, i % ncols), ax))
    }

    /// Check that the figure can hold a `k`-dimensional corner plot
    pub fn axes_grid(&self, k: usize) -> CornerResult<()> {
        if self.axes.len() != k * k {
            return Err(CornerError::InvalidArgument(format!(
                "Provided figure has {} axes, but data has dimensions K={}",
                self.axes.len(),
                k
            )));
        }
        Ok(())
    }

    /// Cell `(row, col)` of the figure's axes viewed as a `k × k` grid
    pub fn grid_cell_mut(&mut self, k: usize, row: usize, col: usize) -> CornerResult<&mut Axes> {
        self.axes_grid(k)?;
        if row >= k || col >= k {
            return Err(CornerError::InvalidArgument(format!(
                "axes ({}, {}) is outside a {}x{} grid",
                row, col, k, k
            )));
        }
        self.axes
            .get_mut(row * k + col)
            .ok_or_else(|| CornerError::InvalidArgument(format!("no axes at ({}, {})", row, col)))
    }

    /// Image size in pixels at `dpi`
    pub fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        (
            (self.width * dpi).round().max(1.0) as u32,
            (self.height * dpi).round().max(1.0) as u32,
        )
    }

    /// Pixel rectangle of axes `(row, col)` in an image of the given size
    pub fn axes_rect(&self, row: usize, col: usize, width_px: f64, height_px: f64) -> Rect {
        let l = &self.layout;
        let ncols = self.ncols.max(1) as f64;
        let nrows = self.nrows.max(1) as f64;

        let cell_w = (l.right - l.left) / (ncols + l.wspace * (ncols - 1.0));
        let cell_h = (l.top - l.bottom) / (nrows + l.hspace * (nrows - 1.0));
        let x0 = l.left + col as f64 * cell_w * (1.0 + l.wspace);
        let top = l.top - row as f64 * cell_h * (1.0 + l.hspace);

        Rect {
            x: x0 * width_px,
            y: (1.0 - top) * height_px,
            w: cell_w * width_px,
            h: cell_h * height_px,
        }
    }
}

/// Data → pixel mapping for one axes
#[derive(Clone, Copy, Debug)]
pub struct AxesTransform {
    pub rect: Rect,
    x_scale: Scale,
    y_scale: Scale,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl AxesTransform {
    pub fn new(rect: Rect, axes: &Axes) -> Self {
        let (xlo, xhi) = axes.view_xlim();
        let (ylo, yhi) = axes.view_ylim();
        let (xs, ys) = (axes.x.scale, axes.y.scale);
        Self {
            rect,
            x_scale: xs,
            y_scale: ys,
            x0: xs.forward(xlo),
            x1: xs.forward(xhi),
            y0: ys.forward(ylo),
            y1: ys.forward(yhi),
        }
    }

    pub fn x_pixel(&self, x: f64) -> f64 {
        let t = (self.x_scale.forward(x) - self.x0) / (self.x1 - self.x0);
        self.rect.x + t * self.rect.w
    }

    pub fn y_pixel(&self, y: f64) -> f64 {
        let t = (self.y_scale.forward(y) - self.y0) / (self.y1 - self.y0);
        self.rect.y + (1.0 - t) * self.rect.h
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x_pixel(x), self.y_pixel(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_grid_dimensions() {
        let fig = Figure::corner_grid(3);
        // 1.0 + (6.0 + 0.2) + 0.4
        assert!((fig.width - 7.6).abs() < 1e-12);
        assert_eq!(fig.width, fig.height);
        assert_eq!(fig.num_axes(), 9);
        assert!((fig.layout.left - 1.0 / 7.6).abs() < 1e-12);
        assert!((fig.layout.top - 7.2 / 7.6).abs() < 1e-12);
    }

    #[test]
    fn test_axes_grid_mismatch() {
        let fig = Figure::corner_grid(3);
        assert!(fig.axes_grid(3).is_ok());
        let err = fig.axes_grid(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: Provided figure has 9 axes, but data has dimensions K=2"
        );
    }

    #[test]
    fn test_axes_rect_tiles_without_overlap() {
        let fig = Figure::corner_grid(2);
        let (w, h) = (fig.width * 100.0, fig.height * 100.0);
        let a = fig.axes_rect(0, 0, w, h);
        let b = fig.axes_rect(0, 1, w, h);
        let c = fig.axes_rect(1, 0, w, h);

        assert!((a.x - 100.0).abs() < 1e-9);
        assert!((a.w - 200.0).abs() < 1e-9);
        assert!((b.x - a.right() - 10.0).abs() < 1e-9);
        assert!((c.y - a.bottom() - 10.0).abs() < 1e-9);
        assert!((c.bottom() - (h - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_transform_reversed_and_log() {
        let mut ax = Axes::new();
        ax.set_xlim(1.0, 0.0);
        ax.set_yscale(Scale::Log);
        ax.set_ylim(1.0, 100.0);
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
        };
        let t = AxesTransform::new(rect, &ax);
        assert!((t.x_pixel(1.0) - 0.0).abs() < 1e-9);
        assert!((t.x_pixel(0.25) - 75.0).abs() < 1e-9);
        assert!((t.y_pixel(10.0) - 50.0).abs() < 1e-9);
        assert!((t.y_pixel(100.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_autoscale_from_artists() {
        let mut ax = Axes::new();
        assert_eq!(ax.view_xlim(), (0.0, 1.0));
        ax.plot(vec![0.0, 10.0], vec![5.0, 5.0], LineStyle::default());
        let (lo, hi) = ax.view_xlim();
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
        let (ylo, yhi) = ax.view_ylim();
        assert!(ylo < 5.0 && yhi > 5.0);
    }

    #[test]
    fn test_title_display() {
        let t = Title::summary(Some("x".into()), "0.01", "1.00", "1.05");
        assert_eq!(t.to_string(), "x = 0.01_{-1.00}^{+1.05}");
        assert_eq!(Title::text("y").to_string(), "y");
    }

    #[test]
    fn test_marker_codes() {
        assert_eq!("s".parse::<Marker>().unwrap(), Marker::Square);
        assert_eq!(Marker::Triangle.to_string(), "^");
        assert!("?".parse::<Marker>().is_err());
    }
}
