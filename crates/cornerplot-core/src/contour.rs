//! Contour extraction on rectilinear grids
//!
//! Marching triangles: every grid cell is split along its diagonal into two
//! triangles, over which the field is linear. Iso-lines are straight
//! segments inside each triangle and bands are the triangle clipped to the
//! value interval, so both are exact for piecewise-linear data.

use ndarray::Array2;

use crate::error::{CornerError, CornerResult};

/// A line segment between two grid-space points
pub type Segment = [(f64, f64); 2];

#[derive(Clone, Copy, Debug)]
struct Vertex {
    x: f64,
    y: f64,
    z: f64,
}

impl Vertex {
    /// Point on the edge `self → other` where the field equals `level`
    fn crossing(&self, other: &Vertex, level: f64) -> Vertex {
        let t = (level - self.z) / (other.z - self.z);
        Vertex {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
            z: level,
        }
    }

    fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

fn check_shape(x: &[f64], y: &[f64], z: &Array2<f64>) -> CornerResult<()> {
    if z.dim() != (x.len(), y.len()) {
        return Err(CornerError::Shape(format!(
            "contour grid is {:?} but coordinates are {}x{}",
            z.dim(),
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

/// The two triangles of every cell, plus the cell's four corners
fn cells<'a>(
    x: &'a [f64],
    y: &'a [f64],
    z: &'a Array2<f64>,
) -> impl Iterator<Item = [Vertex; 4]> + 'a {
    let nx = x.len().saturating_sub(1);
    let ny = y.len().saturating_sub(1);
    (0..nx).flat_map(move |i| {
        (0..ny).map(move |j| {
            let v = |a: usize, b: usize| Vertex {
                x: x[a],
                y: y[b],
                z: z[[a, b]],
            };
            [v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1)]
        })
    })
}

fn split(cell: &[Vertex; 4]) -> [[Vertex; 3]; 2] {
    [[cell[0], cell[1], cell[2]], [cell[0], cell[2], cell[3]]]
}

/// Iso-line segments where `z == level`
///
/// `z` is indexed `[ix, iy]` with `x.len()` × `y.len()` entries.
pub fn contour_lines(x: &[f64], y: &[f64], z: &Array2<f64>, level: f64) -> CornerResult<Vec<Segment>> {
    check_shape(x, y, z)?;
    let mut segments = Vec::new();

    for cell in cells(x, y, z) {
        for tri in split(&cell) {
            if tri.iter().any(|v| !v.z.is_finite()) {
                continue;
            }
            let mut points = Vec::with_capacity(2);
            for k in 0..3 {
                let (a, b) = (&tri[k], &tri[(k + 1) % 3]);
                if (a.z >= level) != (b.z >= level) {
                    points.push(a.crossing(b, level).point());
                }
            }
            if let [p, q] = points[..] {
                segments.push([p, q]);
            }
        }
    }
    Ok(segments)
}

/// Polygons covering the region `lo <= z <= hi`
pub fn contour_bands(
    x: &[f64],
    y: &[f64],
    z: &Array2<f64>,
    lo: f64,
    hi: f64,
) -> CornerResult<Vec<Vec<(f64, f64)>>> {
    check_shape(x, y, z)?;
    let mut polygons = Vec::new();
    let in_band = |v: &Vertex| v.z >= lo && v.z <= hi;

    for cell in cells(x, y, z) {
        if cell.iter().any(|v| !v.z.is_finite()) {
            continue;
        }
        if cell.iter().all(in_band) {
            polygons.push(cell.iter().map(Vertex::point).collect());
            continue;
        }
        if cell.iter().all(|v| v.z < lo) || cell.iter().all(|v| v.z > hi) {
            continue;
        }

        for tri in split(&cell) {
            let clipped = clip(&clip(&tri, lo, true), hi, false);
            if clipped.len() >= 3 {
                polygons.push(clipped.iter().map(Vertex::point).collect());
            }
        }
    }
    Ok(polygons)
}

/// Keep the part of `poly` above (`keep_above`) or below `level`
fn clip(poly: &[Vertex], level: f64, keep_above: bool) -> Vec<Vertex> {
    let inside = |v: &Vertex| {
        if keep_above {
            v.z >= level
        } else {
            v.z <= level
        }
    };

    let n = poly.len();
    let mut out = Vec::with_capacity(n + 2);
    for i in 0..n {
        let cur = &poly[i];
        let prev = &poly[(i + n - 1) % n];
        match (inside(prev), inside(cur)) {
            (true, true) => out.push(*cur),
            (false, true) => {
                out.push(prev.crossing(cur, level));
                out.push(*cur);
            }
            (true, false) => out.push(prev.crossing(cur, level)),
            (false, false) => {}
        }
    }
    out
}
