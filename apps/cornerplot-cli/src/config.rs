//! Option files
//!
//! A config file holds a `[corner]` table with [`CornerOptions`] and an
//! `[export]` table with [`ExportConfig`]; both may be omitted.

use std::path::{Path, PathBuf};

use cornerplot_core::{CornerOptions, ExportConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub corner: CornerOptions,
    pub export: ExportConfig,
}

impl FileConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit`, else the user config file if there is one, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/cornerplot/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cornerplot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cornerplot_core::{PerDim, Scale};
    use std::io::Write;

    #[test]
    fn test_parse_sections() {
        let config = FileConfig::from_toml(
            r#"
            [corner]
            bins = 30
            axes_scale = ["linear", "log"]
            quantiles = [0.16, 0.5, 0.84]
            color = "C2"

            [corner.hist2d]
            fill_contours = true

            [export]
            dpi = 200.0
            "#,
        )
        .unwrap();

        assert_eq!(config.corner.bins, PerDim::All(30));
        assert_eq!(
            config.corner.axes_scale,
            PerDim::Each(vec![Scale::Linear, Scale::Log])
        );
        assert!(config.corner.hist2d.fill_contours);
        assert!(config.corner.hist2d.plot_contours);
        assert_eq!(config.export.dpi, 200.0);
        assert!(config.export.include_text);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(FileConfig::from_toml("").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[export]\ninclude_text = false\n").unwrap();

        let config = FileConfig::resolve(Some(file.path())).unwrap();
        assert!(!config.export.include_text);
    }

    #[test]
    fn test_load_errors() {
        let err = FileConfig::load(Path::new("/nonexistent/cornerplot.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[corner]\nbins = \"many\"\n").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_round_trip_defaults() {
        let text = FileConfig::default().to_toml().unwrap();
        assert!(text.contains("[corner]"));
        assert_eq!(FileConfig::from_toml(&text).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_default_path() {
        if let Some(path) = default_path() {
            assert!(path.ends_with("cornerplot/config.toml"));
        }
    }
}
