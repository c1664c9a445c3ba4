//! Options controlling a corner plot
//!
//! Every field has a default, so option files only need to mention what
//! they change:
//!
//! ```toml
//! bins = 30
//! axes_scale = ["linear", "log", "linear"]
//! show_titles = true
//! quantiles = [0.16, 0.5, 0.84]
//!
//! [hist2d]
//! fill_contours = true
//! ```

use serde::{Deserialize, Serialize};

use crate::axis::Scale;
use crate::color::Color;
use crate::error::{validation, CornerError, CornerResult};

/// A setting given once for all dimensions or once per dimension
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerDim<T> {
    All(T),
    Each(Vec<T>),
}

impl<T: Clone> PerDim<T> {
    /// Expand to one value per dimension
    pub fn resolve(&self, ndim: usize, what: &str) -> CornerResult<Vec<T>> {
        match self {
            PerDim::All(v) => Ok(vec![v.clone(); ndim]),
            PerDim::Each(values) => {
                validation::validate_len(what, values.len(), ndim)?;
                Ok(values.clone())
            }
        }
    }

    fn values(&self) -> &[T] {
        match self {
            PerDim::All(v) => std::slice::from_ref(v),
            PerDim::Each(values) => values,
        }
    }
}

impl<T> From<T> for PerDim<T> {
    fn from(value: T) -> Self {
        PerDim::All(value)
    }
}

impl<T> From<Vec<T>> for PerDim<T> {
    fn from(values: Vec<T>) -> Self {
        PerDim::Each(values)
    }
}

/// Plot range of one dimension
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    /// Explicit `[lo, hi]`; `lo > hi` flips the axis
    Bounds([f64; 2]),
    /// Central interval holding this fraction of the samples
    Fraction(f64),
}

/// Options for the 2D panels
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hist2dOptions {
    /// Enclosed masses of the contours (default: 0.5σ..2σ)
    pub levels: Option<Vec<f64>>,
    pub plot_datapoints: bool,
    pub plot_density: bool,
    pub plot_contours: bool,
    /// Skip the white mask that hides points inside the outer contour
    pub no_fill_contours: bool,
    /// Fill between contours instead of shading the density
    pub fill_contours: bool,
    pub data_alpha: f32,
    /// Data point diameter in points
    pub data_marker_size: f64,
    /// Contour stroke width in points
    pub contour_line_width: f64,
}

impl Default for Hist2dOptions {
    fn default() -> Self {
        Self {
            levels: None,
            plot_datapoints: true,
            plot_density: true,
            plot_contours: true,
            no_fill_contours: false,
            fill_contours: false,
            data_alpha: 0.1,
            data_marker_size: 2.0,
            contour_line_width: 1.5,
        }
    }
}

impl Hist2dOptions {
    pub fn validate(&self) -> CornerResult<()> {
        if let Some(levels) = &self.levels {
            if let Some(l) = levels.iter().find(|l| !(**l > 0.0 && **l < 1.0)) {
                return Err(CornerError::InvalidConfig(format!(
                    "contour levels must lie strictly between 0 and 1, got {}",
                    l
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.data_alpha) {
            return Err(CornerError::InvalidConfig(format!(
                "data_alpha must be between 0 and 1, got {}",
                self.data_alpha
            )));
        }
        Ok(())
    }
}

/// Options for [`corner`](crate::corner::corner)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerOptions {
    pub bins: PerDim<usize>,
    pub range: Option<Vec<RangeSpec>>,
    pub axes_scale: PerDim<Scale>,
    pub weights: Option<Vec<f64>>,
    pub color: Color,
    /// Multiplier on `bins` for the diagonal histograms
    pub hist_bin_factor: PerDim<f64>,
    /// Gaussian σ (in bins) for the 2D histograms
    pub smooth: Option<f64>,
    /// Gaussian σ (in bins) for the 1D histograms
    pub smooth1d: Option<f64>,
    pub labels: Option<Vec<String>>,
    pub titles: Option<Vec<String>>,
    pub show_titles: bool,
    /// Number format for quantile titles; `None` (written `""`) means label only
    #[serde(with = "title_fmt_serde")]
    pub title_fmt: Option<String>,
    pub title_quantiles: Option<Vec<f64>>,
    /// Missing entries are written as `nan`; `null` and `"none"` also read as missing
    #[serde(with = "truths_serde")]
    pub truths: Option<Vec<Option<f64>>>,
    pub truth_color: Color,
    pub scale_hist: bool,
    pub quantiles: Vec<f64>,
    pub verbose: bool,
    pub max_n_ticks: usize,
    pub top_ticks: bool,
    pub reverse: bool,
    pub hist2d: Hist2dOptions,
}

impl Default for CornerOptions {
    fn default() -> Self {
        Self {
            bins: PerDim::All(20),
            range: None,
            axes_scale: PerDim::All(Scale::Linear),
            weights: None,
            color: Color::BLACK,
            hist_bin_factor: PerDim::All(1.0),
            smooth: None,
            smooth1d: None,
            labels: None,
            titles: None,
            show_titles: false,
            title_fmt: Some(".2f".to_string()),
            title_quantiles: None,
            truths: None,
            truth_color: Color::rgb(70.0 / 255.0, 130.0 / 255.0, 180.0 / 255.0),
            scale_hist: false,
            quantiles: Vec::new(),
            verbose: false,
            max_n_ticks: 5,
            top_ticks: false,
            reverse: false,
            hist2d: Hist2dOptions::default(),
        }
    }
}

impl CornerOptions {
    pub fn with_bins(mut self, bins: impl Into<PerDim<usize>>) -> Self {
        self.bins = bins.into();
        self
    }

    pub fn with_range(mut self, range: Vec<RangeSpec>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_axes_scale(mut self, scale: impl Into<PerDim<Scale>>) -> Self {
        self.axes_scale = scale.into();
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_quantiles(mut self, quantiles: Vec<f64>) -> Self {
        self.quantiles = quantiles;
        self
    }

    pub fn with_truths(mut self, truths: Vec<Option<f64>>) -> Self {
        self.truths = Some(truths);
        self
    }

    pub fn with_titles(mut self) -> Self {
        self.show_titles = true;
        self
    }

    pub fn with_smooth(mut self, sigma: f64) -> Self {
        self.smooth = Some(sigma);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Parse options from TOML
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize options to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse options from JSON
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize options to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks that do not depend on the samples
    pub fn validate(&self) -> CornerResult<()> {
        validation::validate_quantiles("quantiles", &self.quantiles)?;

        match &self.title_quantiles {
            Some(tq) => {
                validation::validate_quantiles("title_quantiles", tq)?;
                if tq.len() != 3 {
                    return Err(CornerError::InvalidConfig(
                        "'title_quantiles' must contain exactly three values; \
                         pass a length-3 list using the 'title_quantiles' argument"
                            .to_string(),
                    ));
                }
            }
            None if self.show_titles && !self.quantiles.is_empty() && self.quantiles.len() != 3 => {
                return Err(CornerError::InvalidConfig(
                    "'title_quantiles' must contain exactly three values; \
                     'quantiles' has a different length, so pass 'title_quantiles' explicitly"
                        .to_string(),
                ));
            }
            None => {}
        }

        for (what, sigma) in [("smooth", self.smooth), ("smooth1d", self.smooth1d)] {
            if let Some(s) = sigma {
                if !(s >= 0.0) {
                    return Err(CornerError::InvalidConfig(format!(
                        "'{}' must be non-negative, got {}",
                        what, s
                    )));
                }
            }
        }

        if let Some(f) = self.hist_bin_factor.values().iter().find(|f| !(**f > 0.0)) {
            return Err(CornerError::InvalidConfig(format!(
                "'hist_bin_factor' must be positive, got {}",
                f
            )));
        }
        if self.bins.values().contains(&0) {
            return Err(CornerError::InvalidConfig(
                "'bins' must be at least 1".to_string(),
            ));
        }

        self.hist2d.validate()
    }

    /// Quantiles used for the diagonal titles
    pub fn resolved_title_quantiles(&self) -> Vec<f64> {
        match &self.title_quantiles {
            Some(tq) => tq.clone(),
            None if self.quantiles.len() == 3 => self.quantiles.clone(),
            None => vec![0.16, 0.5, 0.84],
        }
    }

    /// Title number format, `None` when titles show the label only
    pub fn title_format(&self) -> Option<&str> {
        self.title_fmt.as_deref().filter(|f| !f.is_empty())
    }
}

mod title_fmt_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(fmt: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        fmt.as_deref().unwrap_or("").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(d)?.filter(|f| !f.is_empty()))
    }
}

mod truths_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Number(Option<f64>),
        Word(String),
    }

    pub fn serialize<S: Serializer>(
        truths: &Option<Vec<Option<f64>>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        truths
            .as_ref()
            .map(|t| t.iter().map(|v| v.unwrap_or(f64::NAN)).collect::<Vec<f64>>())
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<Option<f64>>>, D::Error> {
        let Some(entries) = Option::<Vec<Entry>>::deserialize(d)? else {
            return Ok(None);
        };
        entries
            .into_iter()
            .map(|entry| match entry {
                Entry::Number(v) => Ok(v.filter(|x| !x.is_nan())),
                Entry::Word(w) if w.eq_ignore_ascii_case("none") => Ok(None),
                Entry::Word(w) => Err(D::Error::custom(format!("invalid truth value '{}'", w))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = CornerOptions::default();
        assert_eq!(opts.bins, PerDim::All(20));
        assert_eq!(opts.title_format(), Some(".2f"));
        assert_eq!(opts.truth_color.to_hex(), "#4682b4");
        assert!(opts.hist2d.plot_density);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let opts = CornerOptions::from_toml(
            r#"
            bins = [10, 20, 30]
            axes_scale = "log"
            range = [[0.0, 1.0], 0.99, [5.0, -5.0]]
            color = "C1"
            show_titles = true

            [hist2d]
            fill_contours = true
            "#,
        )
        .unwrap();

        assert_eq!(opts.bins, PerDim::Each(vec![10, 20, 30]));
        assert_eq!(opts.axes_scale, PerDim::All(Scale::Log));
        assert_eq!(
            opts.range.as_deref().unwrap(),
            [
                RangeSpec::Bounds([0.0, 1.0]),
                RangeSpec::Fraction(0.99),
                RangeSpec::Bounds([5.0, -5.0])
            ]
        );
        assert_eq!(opts.color.to_hex(), "#ff7f0e");
        assert!(opts.hist2d.fill_contours);
        assert!(opts.hist2d.plot_contours);
    }

    #[test]
    fn test_toml_roundtrip() {
        let opts = CornerOptions::default()
            .with_bins(vec![5usize, 6])
            .with_labels(["a", "b"])
            .with_quantiles(vec![0.16, 0.5, 0.84]);
        let text = opts.to_toml().unwrap();
        let parsed = CornerOptions::from_toml(&text).unwrap();
        assert_eq!(parsed.bins, opts.bins);
        assert_eq!(parsed.labels, opts.labels);
        assert_eq!(parsed.quantiles, opts.quantiles);
        assert_eq!(parsed.title_fmt, opts.title_fmt);
    }

    #[test]
    fn test_toml_roundtrip_with_missing_truth() {
        let opts = CornerOptions::default().with_truths(vec![Some(1.0), None, Some(-2.5)]);
        let text = opts.to_toml().unwrap();
        assert!(text.contains("nan"), "{}", text);

        let parsed = CornerOptions::from_toml(&text).unwrap();
        assert_eq!(parsed.truths, opts.truths);

        let words = CornerOptions::from_toml("truths = [0.5, \"none\"]").unwrap();
        assert_eq!(words.truths, Some(vec![Some(0.5), None]));
        assert!(CornerOptions::from_toml("truths = [\"maybe\"]").is_err());
    }

    #[test]
    fn test_label_only_titles_survive_roundtrip() {
        let mut opts = CornerOptions::default().with_titles();
        opts.title_fmt = None;

        let text = opts.to_toml().unwrap();
        let parsed = CornerOptions::from_toml(&text).unwrap();
        assert_eq!(parsed.title_fmt, None);
        assert_eq!(parsed.title_format(), None);
        assert!(parsed.show_titles);

        let json = CornerOptions::from_json(&opts.to_json().unwrap()).unwrap();
        assert_eq!(json.title_fmt, None);

        // An absent key still means the default format
        assert_eq!(CornerOptions::from_toml("").unwrap().title_fmt, Some(".2f".into()));
    }

    #[test]
    fn test_json_with_missing_truths() {
        let opts = CornerOptions::from_json(r#"{"truths": [1.0, null, 3.0]}"#).unwrap();
        assert_eq!(opts.truths, Some(vec![Some(1.0), None, Some(3.0)]));
    }

    #[test]
    fn test_per_dim_resolve() {
        assert_eq!(PerDim::All(3).resolve(2, "bins").unwrap(), vec![3, 3]);
        assert!(PerDim::Each(vec![1, 2]).resolve(3, "bins").is_err());
    }

    #[test]
    fn test_title_quantiles_validation() {
        let bad = CornerOptions {
            quantiles: vec![0.05, 0.16, 0.5, 0.84, 0.95],
            show_titles: true,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let no_titles = CornerOptions {
            show_titles: false,
            ..bad.clone()
        };
        assert!(no_titles.validate().is_ok());

        let explicit = CornerOptions {
            title_quantiles: Some(vec![0.05, 0.5, 0.95]),
            ..bad.clone()
        };
        assert!(explicit.validate().is_ok());
        assert_eq!(explicit.resolved_title_quantiles(), vec![0.05, 0.5, 0.95]);

        let wrong_len = CornerOptions {
            title_quantiles: Some(vec![0.05, 0.95]),
            ..Default::default()
        };
        assert!(wrong_len.validate().is_err());
    }

    #[test]
    fn test_title_quantiles_follow_quantiles() {
        let opts = CornerOptions::default().with_quantiles(vec![0.1, 0.5, 0.9]);
        assert_eq!(opts.resolved_title_quantiles(), vec![0.1, 0.5, 0.9]);
        assert_eq!(
            CornerOptions::default().resolved_title_quantiles(),
            vec![0.16, 0.5, 0.84]
        );
    }

    #[test]
    fn test_invalid_values() {
        let opts = CornerOptions::default().with_quantiles(vec![1.5]);
        assert!(opts.validate().is_err());

        let opts = CornerOptions {
            hist_bin_factor: PerDim::All(0.0),
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        assert!(CornerOptions::default().with_bins(0usize).validate().is_err());

        let mut opts = CornerOptions::default();
        opts.hist2d.levels = Some(vec![0.5, 1.0]);
        assert!(opts.validate().is_err());
    }
}
