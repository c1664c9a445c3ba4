//! Figure export
//!
//! Supports writing figures to:
//! - PNG: raster image through the plotters bitmap backend
//! - SVG: vector image, also available as an in-memory string

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use plotters::prelude::{BitMapBackend, IntoDrawingArea, SVGBackend};
use plotters::style::FontStyle;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::error::{validation, CornerResult, ExportError};
use crate::figure::Figure;
use crate::render::{backend_err, render, FONT_FAMILY};

static RASTER_FONT: AtomicBool = AtomicBool::new(false);

/// Register the TrueType/OpenType font used for raster text
///
/// SVG output names the font family and leaves glyphs to the viewer, so
/// this only matters for PNG. Without a registered font raster exports
/// are drawn without text.
pub fn register_font(path: impl AsRef<Path>) -> CornerResult<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(ExportError::Io)?;
    // plotters keeps registered fonts for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        ExportError::Font {
            path: path.to_path_buf(),
            message: "not a valid TrueType/OpenType font".to_string(),
        }
    })?;
    RASTER_FONT.store(true, Ordering::Release);
    info!(path = %path.display(), "registered raster font");
    Ok(())
}

/// Whether [`register_font`] has succeeded in this process
pub fn has_raster_font() -> bool {
    RASTER_FONT.load(Ordering::Acquire)
}

fn raster_config(config: &ExportConfig) -> ExportConfig {
    if config.include_text && !has_raster_font() {
        warn!("no raster font registered, drawing PNG without text");
        return config.clone().without_text();
    }
    config.clone()
}

/// Export format for figures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG raster image
    Png,
    /// SVG scalable vector graphics
    Svg,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    pub fn is_raster(&self) -> bool {
        matches!(self, ExportFormat::Png)
    }

    pub fn is_vector(&self) -> bool {
        !self.is_raster()
    }

    /// Guess the format from a file extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ExportFormat::Png),
            "svg" => Some(ExportFormat::Svg),
            _ => None,
        }
    }
}

/// Export configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pixels per inch; the figure size is fixed in inches
    pub dpi: f64,

    /// Draw tick labels, axis labels and titles
    ///
    /// Raster text needs a system font, so headless environments may have
    /// to turn this off.
    pub include_text: bool,

    pub background: Color,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: 100.0,
            include_text: true,
            background: Color::WHITE,
        }
    }
}

impl ExportConfig {
    /// Config for raster export at the given resolution
    pub fn png(dpi: f64) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    /// Config for SVG export at the nominal 72 dpi
    pub fn svg() -> Self {
        Self {
            dpi: 72.0,
            ..Default::default()
        }
    }

    /// Publication quality raster
    pub fn publication() -> Self {
        Self::png(300.0)
    }

    pub fn without_text(mut self) -> Self {
        self.include_text = false;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

impl Figure {
    /// Render to an SVG document
    pub fn to_svg(&self, config: &ExportConfig) -> CornerResult<String> {
        let (width, height) = self.pixel_size(config.dpi);
        validation::validate_dimensions(width, height)?;

        let mut out = String::new();
        {
            let root = SVGBackend::with_string(&mut out, (width, height)).into_drawing_area();
            render(self, &root, config)?;
            root.present().map_err(backend_err)?;
        }
        debug!(width, height, bytes = out.len(), "rendered svg");
        Ok(out)
    }

    /// Render to a packed RGB buffer, returning `(width, height, pixels)`
    pub fn to_rgb(&self, config: &ExportConfig) -> CornerResult<(u32, u32, Vec<u8>)> {
        let (width, height) = self.pixel_size(config.dpi);
        validation::validate_dimensions(width, height)?;

        let config = raster_config(config);
        let mut buf = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            render(self, &root, &config)?;
            root.present().map_err(backend_err)?;
        }
        Ok((width, height, buf))
    }

    /// Write the figure to `path`, picking the format from its extension
    pub fn save(&self, path: impl AsRef<Path>, config: &ExportConfig) -> CornerResult<ExportFormat> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path).ok_or_else(|| ExportError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let (width, height) = self.pixel_size(config.dpi);
        validation::validate_dimensions(width, height)?;

        match format {
            ExportFormat::Png => {
                let config = raster_config(config);
                let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
                render(self, &root, &config)?;
                root.present().map_err(backend_err)?;
            }
            ExportFormat::Svg => {
                let root = SVGBackend::new(path, (width, height)).into_drawing_area();
                render(self, &root, config)?;
                root.present().map_err(backend_err)?;
            }
        }
        info!(path = %path.display(), width, height, format = format.extension(), "saved figure");
        Ok(format)
    }
}
