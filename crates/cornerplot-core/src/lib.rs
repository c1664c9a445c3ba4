//! cornerplot-core - Corner plots of multidimensional samples
//!
//! Draws every one- and two-dimensional projection of a sample set on a
//! triangular grid of axes: histograms on the diagonal, binned densities
//! with credible contours below it.
//!
//! # Key Components
//!
//! - **Samples**: `N × K` sample matrix with optional column labels
//! - **CornerOptions**: Per-dimension bins, ranges, scales, truths and quantiles
//! - **Figure / Axes**: Retained scene of artists in data coordinates
//! - **corner**: Builds the full grid from samples and options
//! - **overplot_lines / overplot_points**: Overlays on an existing corner figure
//! - **export**: PNG and SVG output through plotters
//!
//! # Example
//!
//! ```no_run
//! use cornerplot_core::{corner, CornerOptions, ExportConfig, Samples};
//!
//! let samples = Samples::from_rows(&[vec![0.1, 1.2], vec![0.4, 0.9], vec![0.2, 1.1]])?;
//! let options = CornerOptions::default().with_labels(["a", "b"]);
//! let figure = corner(&samples, &options)?;
//! figure.save("corner.png", &ExportConfig::default())?;
//! # Ok::<(), cornerplot_core::CornerError>(())
//! ```

pub mod axis;
pub mod color;
pub mod contour;
pub mod corner;
pub mod error;
pub mod export;
pub mod figure;
pub mod hist2d;
pub mod options;
pub mod overplot;
pub mod render;
pub mod samples;

pub use axis::*;
pub use color::*;
pub use corner::{corner, corner_onto};
pub use error::{CornerError, CornerResult, ExportError, ExportResult};
pub use export::{has_raster_font, register_font, ExportConfig, ExportFormat};
pub use figure::*;
pub use hist2d::{hist2d, Hist2dParams};
pub use options::*;
pub use overplot::{overplot_lines, overplot_points};
pub use samples::Samples;

// render draws onto any plotters backend, access via render:: prefix
