//! cornerplot-stats - Statistical functions for corner plots
//!
//! This crate provides the numerical primitives behind a corner plot:
//!
//! - **Quantiles**: weighted and unweighted sample quantiles
//! - **Histograms**: linear/logarithmic bin edges, 1D and 2D binning
//! - **Smoothing**: Gaussian filtering of binned counts
//! - **Levels**: density thresholds enclosing a given probability mass
//! - **Summary**: min/max/mean/median summaries used for default ranges
//!
//! Everything operates on plain slices or `ndarray` grids and has no
//! knowledge of figures or rendering.

pub mod error;
pub mod histogram;
pub mod levels;
pub mod quantile;
pub mod smooth;
pub mod summary;

pub use error::*;
pub use histogram::*;
pub use levels::*;
pub use quantile::*;
pub use smooth::*;
pub use summary::*;
