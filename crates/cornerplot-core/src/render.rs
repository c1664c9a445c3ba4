//! Rasterising a [`Figure`] with plotters
//!
//! Works directly in pixel space on a `Shift` drawing area: each axes
//! rectangle comes from [`Figure::axes_rect`], artists are mapped with
//! [`AxesTransform`] and clipped to the rectangle before drawing.

use plotters::coord::Shift;
use plotters::prelude::{
    Circle, DrawingArea, DrawingBackend, IntoFont, PathElement, Polygon, RGBAColor, RGBColor,
    Rectangle, Text,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color as _, FontTransform};
use tracing::debug;

use crate::axis::{AxisPosition, AxisState, TickMark};
use crate::color::Color;
use crate::error::{ExportError, ExportResult};
use crate::export::ExportConfig;
use crate::figure::{
    Artist, Axes, AxesTransform, Figure, LineDash, LineStyle, Marker, MarkerStyle, Orientation,
    Rect, Title, TitlePlacement,
};

pub(crate) const FONT_FAMILY: &str = "sans-serif";
/// Font size of tick labels, in points
const TICK_FONT_PT: f64 = 10.0;
/// Font size of axis labels and titles, in points
const LABEL_FONT_PT: f64 = 12.0;
const TICK_LENGTH_PT: f64 = 3.5;
const TICK_PAD_PT: f64 = 3.5;
const FRAME_WIDTH_PT: f64 = 0.8;
/// Axis label offset from the axes, as a fraction of the axes size
const LABEL_OFFSET: f64 = 0.3;

pub(crate) fn backend_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Backend {
        message: e.to_string(),
    }
}

fn rgba(color: Color) -> RGBAColor {
    let (r, g, b) = color.to_rgb8();
    RGBColor(r, g, b).mix(color.a as f64)
}

fn px(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn finite(p: &(f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

/// Draw `figure` onto `root`, which must be sized for `config.dpi`
pub fn render<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    config: &ExportConfig,
) -> ExportResult<()> {
    root.fill(&rgba(config.background)).map_err(backend_err)?;
    let (width, height) = root.dim_in_pixel();
    debug!(width, height, dpi = config.dpi, "rendering figure");

    let painter = Painter {
        root,
        scale: config.dpi / 72.0,
        include_text: config.include_text,
    };
    for ((row, col), ax) in figure.iter_axes() {
        if !ax.visible {
            continue;
        }
        let rect = figure.axes_rect(row, col, width as f64, height as f64);
        painter.draw_axes(ax, rect)?;
    }
    Ok(())
}

struct Painter<'a, DB: DrawingBackend> {
    root: &'a DrawingArea<DB, Shift>,
    /// Pixels per point
    scale: f64,
    include_text: bool,
}

impl<'a, DB: DrawingBackend> Painter<'a, DB> {
    fn pt(&self, points: f64) -> f64 {
        points * self.scale
    }

    fn stroke_px(&self, width_pt: f64) -> u32 {
        self.pt(width_pt).round().max(1.0) as u32
    }

    fn draw_axes(&self, ax: &Axes, rect: Rect) -> ExportResult<()> {
        let t = AxesTransform::new(rect, ax);

        for artist in ax.artists() {
            self.draw_artist(artist, &t)?;
        }
        self.draw_frame(rect)?;
        self.draw_axis(&ax.x, ax.view_xlim(), rect, &t)?;
        self.draw_axis(&ax.y, ax.view_ylim(), rect, &t)?;

        if let Some(title) = &ax.title {
            self.draw_title(title, rect)?;
        }
        Ok(())
    }

    fn draw_artist(&self, artist: &Artist, t: &AxesTransform) -> ExportResult<()> {
        let clip = t.rect;
        match artist {
            Artist::Step {
                edges,
                counts,
                style,
            } => {
                let mut pts = Vec::with_capacity(2 * edges.len() + 2);
                if let (Some(&first), Some(&last)) = (edges.first(), edges.last()) {
                    pts.push(t.to_pixel(first, 0.0));
                    for (w, &c) in edges.windows(2).zip(counts) {
                        pts.push(t.to_pixel(w[0], c));
                        pts.push(t.to_pixel(w[1], c));
                    }
                    pts.push(t.to_pixel(last, 0.0));
                }
                self.stroke(&pts, style, &clip)
            }
            Artist::Line { xs, ys, style } => {
                let pts: Vec<(f64, f64)> = xs
                    .iter()
                    .zip(ys)
                    .map(|(&x, &y)| t.to_pixel(x, y))
                    .filter(finite)
                    .collect();
                self.stroke(&pts, style, &clip)
            }
            Artist::AxLine {
                orientation,
                value,
                style,
            } => {
                let pts = match orientation {
                    Orientation::Vertical => {
                        let x = t.x_pixel(*value);
                        [(x, clip.y), (x, clip.bottom())]
                    }
                    Orientation::Horizontal => {
                        let y = t.y_pixel(*value);
                        [(clip.x, y), (clip.right(), y)]
                    }
                };
                if pts.iter().all(finite) {
                    self.stroke(&pts, style, &clip)?;
                }
                Ok(())
            }
            Artist::Markers { xs, ys, style } => {
                for (&x, &y) in xs.iter().zip(ys) {
                    let p = t.to_pixel(x, y);
                    if finite(&p) && clip.contains(p.0, p.1) {
                        self.marker(p, style)?;
                    }
                }
                Ok(())
            }
            Artist::ContourLines { segments, style } => {
                for &[a, b] in segments {
                    self.stroke(&[t.to_pixel(a.0, a.1), t.to_pixel(b.0, b.1)], style, &clip)?;
                }
                Ok(())
            }
            Artist::Bands { bands } => {
                for band in bands {
                    if band.color.is_transparent() {
                        continue;
                    }
                    for poly in &band.polygons {
                        let pts: Vec<(f64, f64)> =
                            poly.iter().map(|&(x, y)| t.to_pixel(x, y)).collect();
                        self.fill_polygon(&pts, band.color, &clip)?;
                    }
                }
                Ok(())
            }
            Artist::Mesh {
                x_edges,
                y_edges,
                colors,
            } => {
                let ny = y_edges.len().saturating_sub(1);
                for (ix, xw) in x_edges.windows(2).enumerate() {
                    for (iy, yw) in y_edges.windows(2).enumerate() {
                        let Some(&color) = colors.get(ix * ny + iy) else {
                            continue;
                        };
                        if color.is_transparent() {
                            continue;
                        }
                        let (x0, y0) = t.to_pixel(xw[0], yw[0]);
                        let (x1, y1) = t.to_pixel(xw[1], yw[1]);
                        self.fill_rect((x0, y0), (x1, y1), color, &clip)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Stroke a polyline, split into runs that stay inside `clip`
    fn stroke(&self, pts: &[(f64, f64)], style: &LineStyle, clip: &Rect) -> ExportResult<()> {
        if style.color.is_transparent() || pts.len() < 2 {
            return Ok(());
        }
        let shape = rgba(style.color).stroke_width(self.stroke_px(style.width));

        let pieces = match style.dash {
            LineDash::Solid => vec![pts.to_vec()],
            LineDash::Dashed => {
                let lw = self.pt(style.width).max(1.0);
                dash_pattern(pts, 3.7 * lw, 1.6 * lw)
            }
        };

        for piece in pieces {
            let mut run: Vec<(i32, i32)> = Vec::new();
            for w in piece.windows(2) {
                match clip_segment(w[0], w[1], clip) {
                    Some((a, b)) => {
                        let (a, b) = (px(a), px(b));
                        if run.last() != Some(&a) {
                            self.flush(&mut run, shape)?;
                            run.push(a);
                        }
                        run.push(b);
                    }
                    None => self.flush(&mut run, shape)?,
                }
            }
            self.flush(&mut run, shape)?;
        }
        Ok(())
    }

    fn flush(&self, run: &mut Vec<(i32, i32)>, shape: plotters::style::ShapeStyle) -> ExportResult<()> {
        if run.len() >= 2 {
            self.root
                .draw(&PathElement::new(std::mem::take(run), shape))
                .map_err(backend_err)?;
        }
        run.clear();
        Ok(())
    }

    fn fill_polygon(&self, pts: &[(f64, f64)], color: Color, clip: &Rect) -> ExportResult<()> {
        if pts.len() < 3 || !pts.iter().all(finite) {
            return Ok(());
        }
        let clipped = clip_polygon(pts, clip);
        if clipped.len() < 3 {
            return Ok(());
        }
        let points: Vec<(i32, i32)> = clipped.into_iter().map(px).collect();
        self.root
            .draw(&Polygon::new(points, rgba(color).filled()))
            .map_err(backend_err)
    }

    fn fill_rect(
        &self,
        a: (f64, f64),
        b: (f64, f64),
        color: Color,
        clip: &Rect,
    ) -> ExportResult<()> {
        if !finite(&a) || !finite(&b) {
            return Ok(());
        }
        let x0 = a.0.min(b.0).max(clip.x);
        let x1 = a.0.max(b.0).min(clip.right());
        let y0 = a.1.min(b.1).max(clip.y);
        let y1 = a.1.max(b.1).min(clip.bottom());
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        self.root
            .draw(&Rectangle::new(
                [px((x0, y0)), px((x1, y1))],
                rgba(color).filled(),
            ))
            .map_err(backend_err)
    }

    fn marker(&self, p: (f64, f64), style: &MarkerStyle) -> ExportResult<()> {
        let color = rgba(style.color);
        let r = (self.pt(style.size) / 2.0).max(0.5);
        let (x, y) = p;
        let line = |pts: Vec<(f64, f64)>| {
            PathElement::new(
                pts.into_iter().map(px).collect::<Vec<_>>(),
                color.stroke_width(self.stroke_px(1.0)),
            )
        };

        match style.marker {
            Marker::Circle => self
                .root
                .draw(&Circle::new(px(p), r.round().max(1.0) as u32, color.filled()))
                .map_err(backend_err),
            Marker::Square => self
                .root
                .draw(&Rectangle::new(
                    [px((x - r, y - r)), px((x + r, y + r))],
                    color.filled(),
                ))
                .map_err(backend_err),
            Marker::Triangle => self
                .root
                .draw(&Polygon::new(
                    vec![px((x, y - r)), px((x - r, y + r)), px((x + r, y + r))],
                    color.filled(),
                ))
                .map_err(backend_err),
            Marker::Plus => {
                self.root
                    .draw(&line(vec![(x - r, y), (x + r, y)]))
                    .map_err(backend_err)?;
                self.root
                    .draw(&line(vec![(x, y - r), (x, y + r)]))
                    .map_err(backend_err)
            }
            Marker::Cross => {
                self.root
                    .draw(&line(vec![(x - r, y - r), (x + r, y + r)]))
                    .map_err(backend_err)?;
                self.root
                    .draw(&line(vec![(x - r, y + r), (x + r, y - r)]))
                    .map_err(backend_err)
            }
        }
    }

    fn draw_frame(&self, rect: Rect) -> ExportResult<()> {
        let corners = vec![
            px((rect.x, rect.y)),
            px((rect.right(), rect.y)),
            px((rect.right(), rect.bottom())),
            px((rect.x, rect.bottom())),
            px((rect.x, rect.y)),
        ];
        self.root
            .draw(&PathElement::new(
                corners,
                rgba(Color::BLACK).stroke_width(self.stroke_px(FRAME_WIDTH_PT)),
            ))
            .map_err(backend_err)
    }

    fn draw_axis(
        &self,
        axis: &AxisState,
        limits: (f64, f64),
        rect: Rect,
        t: &AxesTransform,
    ) -> ExportResult<()> {
        let ticks: Vec<TickMark> = axis.ticks(limits);

        let len = self.pt(TICK_LENGTH_PT);
        let pad = len + self.pt(TICK_PAD_PT);
        let tick_style = rgba(Color::BLACK).stroke_width(self.stroke_px(FRAME_WIDTH_PT));
        let font_px = self.pt(TICK_FONT_PT);

        for tick in &ticks {
            let (start, end, anchor, pos) = match axis.position {
                AxisPosition::Bottom => {
                    let x = t.x_pixel(tick.value);
                    (
                        (x, rect.bottom()),
                        (x, rect.bottom() + len),
                        (x, rect.bottom() + pad),
                        Pos::new(HPos::Center, VPos::Top),
                    )
                }
                AxisPosition::Top => {
                    let x = t.x_pixel(tick.value);
                    (
                        (x, rect.y),
                        (x, rect.y - len),
                        (x, rect.y - pad),
                        Pos::new(HPos::Center, VPos::Bottom),
                    )
                }
                AxisPosition::Left => {
                    let y = t.y_pixel(tick.value);
                    (
                        (rect.x, y),
                        (rect.x - len, y),
                        (rect.x - pad, y),
                        Pos::new(HPos::Right, VPos::Center),
                    )
                }
                AxisPosition::Right => {
                    let y = t.y_pixel(tick.value);
                    (
                        (rect.right(), y),
                        (rect.right() + len, y),
                        (rect.right() + pad, y),
                        Pos::new(HPos::Left, VPos::Center),
                    )
                }
            };
            if !finite(&start) {
                continue;
            }
            self.root
                .draw(&PathElement::new(vec![px(start), px(end)], tick_style))
                .map_err(backend_err)?;
            if axis.show_tick_labels {
                self.text(&tick.label, anchor, font_px, pos, false)?;
            }
        }

        if let Some(label) = &axis.label {
            let size = self.pt(LABEL_FONT_PT);
            let center = Pos::new(HPos::Center, VPos::Center);
            match axis.position {
                AxisPosition::Bottom => {
                    let at = (rect.x + rect.w / 2.0, rect.bottom() + LABEL_OFFSET * rect.h);
                    self.text(label, at, size, center, false)?;
                }
                AxisPosition::Top => {
                    let at = (rect.x + rect.w / 2.0, rect.y - LABEL_OFFSET * rect.h);
                    self.text(label, at, size, center, false)?;
                }
                AxisPosition::Left => {
                    let at = (rect.x - LABEL_OFFSET * rect.w, rect.y + rect.h / 2.0);
                    self.text(label, at, size, center, true)?;
                }
                AxisPosition::Right => {
                    let at = (rect.right() + LABEL_OFFSET * rect.w, rect.y + rect.h / 2.0);
                    self.text(label, at, size, center, true)?;
                }
            }
        }
        Ok(())
    }

    /// Titles render `a = m_{-x}^{+y}` as a base line plus stacked scripts
    fn draw_title(&self, title: &Title, rect: Rect) -> ExportResult<()> {
        let size = self.pt(LABEL_FONT_PT);
        let cx = rect.x + rect.w / 2.0;
        let cy = match title.placement {
            TitlePlacement::Above => rect.y - size,
            TitlePlacement::Below => rect.bottom() + LABEL_OFFSET * rect.h,
        };

        let Some((median, minus, plus)) = &title.summary else {
            let text = title.to_string();
            return self.text(&text, (cx, cy), size, Pos::new(HPos::Center, VPos::Center), false);
        };

        let base = match &title.label {
            Some(label) => format!("{} = {}", label, median),
            None => median.clone(),
        };
        let sub = format!("-{}", minus);
        let sup = format!("+{}", plus);
        let script = 0.7 * size;

        let base_w = text_width(&base, size);
        let script_w = text_width(&sub, script).max(text_width(&sup, script));
        let left = cx - (base_w + script_w) / 2.0;
        let anchor = Pos::new(HPos::Left, VPos::Center);

        self.text(&base, (left, cy), size, anchor, false)?;
        self.text(&sup, (left + base_w, cy - 0.4 * size), script, anchor, false)?;
        self.text(&sub, (left + base_w, cy + 0.4 * size), script, anchor, false)
    }

    fn text(
        &self,
        text: &str,
        at: (f64, f64),
        size_px: f64,
        pos: Pos,
        vertical: bool,
    ) -> ExportResult<()> {
        if !self.include_text || text.is_empty() || !finite(&at) {
            return Ok(());
        }
        let mut font = (FONT_FAMILY, size_px).into_font();
        if vertical {
            font = font.transform(FontTransform::Rotate270);
        }
        let style = font.color(&rgba(Color::BLACK)).pos(pos);
        self.root
            .draw(&Text::new(text.to_string(), px(at), style))
            .map_err(backend_err)
    }
}

/// Rough advance width of `text` in pixels
fn text_width(text: &str, size_px: f64) -> f64 {
    text.chars().count() as f64 * size_px * 0.6
}

/// Clip a segment to `rect` (Liang-Barsky)
pub(crate) fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    rect: &Rect,
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    let checks = [
        (-dx, p0.0 - rect.x),
        (dx, rect.right() - p0.0),
        (-dy, p0.1 - rect.y),
        (dy, rect.bottom() - p0.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        (p0.0 + t0 * dx, p0.1 + t0 * dy),
        (p0.0 + t1 * dx, p0.1 + t1 * dy),
    ))
}

/// Clip a polygon to `rect` (Sutherland-Hodgman)
pub(crate) fn clip_polygon(poly: &[(f64, f64)], rect: &Rect) -> Vec<(f64, f64)> {
    let mut out = poly.to_vec();
    for edge in 0..4u8 {
        if out.is_empty() {
            break;
        }
        let input = std::mem::take(&mut out);
        let n = input.len();
        for i in 0..n {
            let cur = input[i];
            let prev = input[(i + n - 1) % n];
            match (inside(prev, edge, rect), inside(cur, edge, rect)) {
                (true, true) => out.push(cur),
                (false, true) => {
                    out.push(intersect(prev, cur, edge, rect));
                    out.push(cur);
                }
                (true, false) => out.push(intersect(prev, cur, edge, rect)),
                (false, false) => {}
            }
        }
    }
    out
}

fn inside(p: (f64, f64), edge: u8, rect: &Rect) -> bool {
    match edge {
        0 => p.0 >= rect.x,
        1 => p.0 <= rect.right(),
        2 => p.1 >= rect.y,
        _ => p.1 <= rect.bottom(),
    }
}

fn intersect(a: (f64, f64), b: (f64, f64), edge: u8, rect: &Rect) -> (f64, f64) {
    match edge {
        0 | 1 => {
            let x = if edge == 0 { rect.x } else { rect.right() };
            let t = (x - a.0) / (b.0 - a.0);
            (x, a.1 + t * (b.1 - a.1))
        }
        _ => {
            let y = if edge == 2 { rect.y } else { rect.bottom() };
            let t = (y - a.1) / (b.1 - a.1);
            (a.0 + t * (b.0 - a.0), y)
        }
    }
}

/// Split a polyline into dashes of length `on` separated by gaps of `off`
pub(crate) fn dash_pattern(pts: &[(f64, f64)], on: f64, off: f64) -> Vec<Vec<(f64, f64)>> {
    let mut dashes = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut drawing = true;
    let mut remaining = on;

    if let Some(&first) = pts.first() {
        current.push(first);
    }
    for w in pts.windows(2) {
        let (mut a, b) = (w[0], w[1]);
        let mut seg_len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();

        while seg_len > remaining {
            let t = remaining / seg_len;
            let split = (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1));
            if drawing {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            seg_len -= remaining;
            a = split;
            drawing = !drawing;
            remaining = if drawing { on } else { off };
        }
        remaining -= seg_len;
        if drawing {
            current.push(b);
        }
    }
    if drawing && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        }
    }

    #[test]
    fn test_clip_segment() {
        let r = unit();
        let (a, b) = clip_segment((-5.0, 5.0), (15.0, 5.0), &r).unwrap();
        assert_eq!(a, (0.0, 5.0));
        assert_eq!(b, (10.0, 5.0));

        assert!(clip_segment((-5.0, -5.0), (-1.0, 20.0), &r).is_none());
        let inside = clip_segment((1.0, 1.0), (2.0, 2.0), &r).unwrap();
        assert_eq!(inside, ((1.0, 1.0), (2.0, 2.0)));
    }

    #[test]
    fn test_clip_polygon() {
        let r = unit();
        let square = [(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)];
        let clipped = clip_polygon(&square, &r);
        assert_eq!(clipped.len(), 4);
        assert!(clipped
            .iter()
            .all(|&(x, y)| (0.0..=5.0).contains(&x) && (0.0..=5.0).contains(&y)));

        let outside = [(20.0, 20.0), (30.0, 20.0), (30.0, 30.0)];
        assert!(clip_polygon(&outside, &r).is_empty());
    }

    fn assert_path(actual: &[(f64, f64)], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.0 - e.0).abs() < 1e-9 && (a.1 - e.1).abs() < 1e-9, "{:?}", actual);
        }
    }

    #[test]
    fn test_dash_pattern() {
        let dashes = dash_pattern(&[(0.0, 0.0), (10.0, 0.0)], 3.0, 1.0);
        // 0-3, 4-7, 8-10
        assert_eq!(dashes.len(), 3);
        assert_path(&dashes[0], &[(0.0, 0.0), (3.0, 0.0)]);
        assert_path(&dashes[1], &[(4.0, 0.0), (7.0, 0.0)]);
        assert_path(&dashes[2], &[(8.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn test_dash_pattern_across_vertices() {
        let dashes = dash_pattern(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)], 3.0, 1.0);
        assert_path(&dashes[0], &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0)]);
    }
}
