//! Error types for cornerplot-core
//!
//! Provides error handling for:
//! - Sample and option validation
//! - Statistics failures bubbled up from cornerplot-stats
//! - Reading sample tables
//! - Export failures

use std::path::PathBuf;

use cornerplot_io::IoError;
use cornerplot_stats::StatsError;
use thiserror::Error;

/// Main error type for corner plot operations
#[derive(Error, Debug)]
pub enum CornerError {
    /// Statistics errors (quantiles, histograms, levels)
    #[error("{0}")]
    Stats(#[from] StatsError),

    /// Sample table errors
    #[error("Failed to read samples: {0}")]
    Io(#[from] IoError),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Sample array has an unusable shape
    #[error("Invalid sample shape: {0}")]
    Shape(String),

    /// Options are inconsistent with each other or with the samples
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A call was made with arguments that do not fit the figure
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors related to export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Extension does not name a known format
    #[error("Unsupported output format for {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Canvas is empty or larger than the backends accept
    #[error("Canvas of {width}x{height} pixels is out of bounds")]
    InvalidDimensions { width: u32, height: u32 },

    /// Font file could not be loaded
    #[error("Invalid font {path}: {message}")]
    Font { path: PathBuf, message: String },

    /// Drawing backend failure
    #[error("Drawing backend failed: {message}")]
    Backend { message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for corner plot operations
pub type CornerResult<T> = Result<T, CornerError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Argument checks shared by the builders and exporters
pub mod validation {
    use super::*;

    /// Largest canvas side in pixels
    pub const MAX_PIXELS: u32 = 16384;

    /// Both sides of the canvas must be in `1..=MAX_PIXELS`
    pub fn validate_dimensions(width: u32, height: u32) -> ExportResult<()> {
        let ok = |side: u32| (1..=MAX_PIXELS).contains(&side);
        if ok(width) && ok(height) {
            Ok(())
        } else {
            Err(ExportError::InvalidDimensions { width, height })
        }
    }

    /// Validate that a per-dimension setting has one entry per dimension
    pub fn validate_len(what: &str, actual: usize, ndim: usize) -> CornerResult<()> {
        if actual != ndim {
            return Err(CornerError::InvalidConfig(format!(
                "Dimension mismatch between samples and {} ({} != {})",
                what, actual, ndim
            )));
        }
        Ok(())
    }

    /// Validate that every quantile lies in [0, 1]
    pub fn validate_quantiles(what: &str, quantiles: &[f64]) -> CornerResult<()> {
        if let Some(q) = quantiles.iter().find(|q| !(0.0..=1.0).contains(*q)) {
            return Err(CornerError::InvalidConfig(format!(
                "'{}' values must be between 0 and 1, got {}",
                what, q
            )));
        }
        Ok(())
    }
}
