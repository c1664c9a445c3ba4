//! Axis state, scales and tick placement
//!
//! Provides tick mark calculation and label formatting for the small
//! panels of a corner plot, where only a handful of ticks fit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Side of the axes rectangle an axis is drawn on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPosition {
    Left,
    Right,
    Top,
    Bottom,
}

impl AxisPosition {
    /// Check if this is a vertical axis
    pub fn is_vertical(&self) -> bool {
        matches!(self, AxisPosition::Left | AxisPosition::Right)
    }

    /// Check if this is a horizontal axis
    pub fn is_horizontal(&self) -> bool {
        !self.is_vertical()
    }
}

/// Scale type for an axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl Scale {
    /// Map a data value into the space where the axis is linear
    pub fn forward(&self, value: f64) -> f64 {
        match self {
            Scale::Linear => value,
            Scale::Log => value.log10(),
        }
    }

    /// Inverse of [`Scale::forward`]
    pub fn inverse(&self, value: f64) -> f64 {
        match self {
            Scale::Linear => value,
            Scale::Log => 10f64.powf(value),
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, Scale::Log)
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Scale::Linear),
            "log" => Ok(Scale::Log),
            other => Err(format!("unknown axis scale '{}' (expected linear or log)", other)),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Linear => f.write_str("linear"),
            Scale::Log => f.write_str("log"),
        }
    }
}

/// State of one axis of an [`Axes`](crate::figure::Axes)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    /// Side holding the ticks and labels
    pub position: AxisPosition,

    /// Scale type
    pub scale: Scale,

    /// View limits; `lo > hi` flips the axis
    pub limits: Option<(f64, f64)>,

    /// Label for the axis
    pub label: Option<String>,

    /// Maximum number of major ticks (0 disables ticks)
    pub max_n_ticks: usize,

    /// Drop the lowest tick so neighbouring panels do not collide
    pub prune_lower: bool,

    /// Whether to show tick marks
    pub show_ticks: bool,

    /// Whether to show tick labels
    pub show_tick_labels: bool,
}

impl AxisState {
    /// Create a new axis on the given side
    pub fn new(position: AxisPosition) -> Self {
        Self {
            position,
            scale: Scale::Linear,
            limits: None,
            label: None,
            max_n_ticks: 5,
            prune_lower: false,
            show_ticks: true,
            show_tick_labels: true,
        }
    }

    /// Set the axis label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Set the view limits
    pub fn with_limits(mut self, lo: f64, hi: f64) -> Self {
        self.limits = Some((lo, hi));
        self
    }

    /// Whether the view limits run from high to low
    pub fn is_inverted(&self) -> bool {
        matches!(self.limits, Some((lo, hi)) if lo > hi)
    }

    /// Position of `value` along the axis: 0 at `limits.0`, 1 at `limits.1`
    pub fn normalize(&self, value: f64) -> Option<f64> {
        let (lo, hi) = self.limits?;
        let (flo, fhi) = (self.scale.forward(lo), self.scale.forward(hi));
        let span = fhi - flo;
        if span == 0.0 || !span.is_finite() {
            return None;
        }
        Some((self.scale.forward(value) - flo) / span)
    }

    /// Major ticks within `view`, the explicit or autoscaled limits
    pub fn ticks(&self, view: (f64, f64)) -> Vec<TickMark> {
        if !self.show_ticks {
            return Vec::new();
        }
        calculate_ticks(self.scale, view, self.max_n_ticks, self.prune_lower)
    }
}

/// A tick mark on an axis
#[derive(Clone, Debug, PartialEq)]
pub struct TickMark {
    /// Position in data coordinates
    pub value: f64,

    /// Position in normalized coordinates (0.0 at `limits.0`, 1.0 at `limits.1`)
    pub normalized: f64,

    /// Label text
    pub label: String,
}

const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Calculate at most `max_n_ticks` major ticks inside `limits`
pub fn calculate_ticks(
    scale: Scale,
    limits: (f64, f64),
    max_n_ticks: usize,
    prune_lower: bool,
) -> Vec<TickMark> {
    let (lo, hi) = (limits.0.min(limits.1), limits.0.max(limits.1));
    if max_n_ticks == 0 || !lo.is_finite() || !hi.is_finite() || lo == hi {
        return Vec::new();
    }
    if scale.is_log() && lo <= 0.0 {
        return Vec::new();
    }

    let mut values = match scale {
        Scale::Log => log_tick_values(lo, hi, max_n_ticks),
        Scale::Linear => Vec::new(),
    };
    let labels: Vec<String> = if values.is_empty() {
        let (linear, step) = linear_tick_values(lo, hi, max_n_ticks);
        values = linear;
        values.iter().map(|&v| format_tick(v, step)).collect()
    } else {
        values
            .iter()
            .map(|v| format!("10{}", superscript(v.log10().round() as i32)))
            .collect()
    };

    let flo = scale.forward(limits.0);
    let span = scale.forward(limits.1) - flo;

    let mut ticks: Vec<TickMark> = values
        .into_iter()
        .zip(labels)
        .map(|(value, label)| TickMark {
            value,
            normalized: (scale.forward(value) - flo) / span,
            label,
        })
        .collect();

    if prune_lower && !ticks.is_empty() {
        ticks.remove(0);
    }
    ticks
}

fn linear_tick_values(lo: f64, hi: f64, max_n_ticks: usize) -> (Vec<f64>, f64) {
    let raw = (hi - lo) / max_n_ticks as f64;
    let mut magnitude = 10f64.powf(raw.log10().floor());

    for _ in 0..4 {
        for nice in NICE_STEPS {
            let step = nice * magnitude;
            let first = (lo / step - 1e-9).ceil() as i64;
            let last = (hi / step + 1e-9).floor() as i64;
            if last - first + 1 <= max_n_ticks as i64 {
                let values = (first..=last)
                    .map(|k| {
                        let v = k as f64 * step;
                        if v.abs() < step * 1e-10 {
                            0.0
                        } else {
                            v
                        }
                    })
                    .collect();
                return (values, step);
            }
        }
        magnitude *= 10.0;
    }
    (Vec::new(), raw)
}

fn log_tick_values(lo: f64, hi: f64, max_n_ticks: usize) -> Vec<f64> {
    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    if last < first {
        return Vec::new();
    }

    let count = (last - first + 1) as usize;
    let stride = count.div_ceil(max_n_ticks).max(1) as i32;
    (first..=last)
        .filter(|d| (d - first) % stride == 0)
        .map(|d| 10f64.powi(d))
        .collect()
}

/// Tick label with just enough decimals for the tick spacing
fn format_tick(value: f64, step: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.abs() >= 1e5 || step < 1e-4 {
        return format_exponent(value, 1);
    }
    let decimals = (0..=6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
        })
        .unwrap_or(6);
    format!("{:.*}", decimals as usize, value)
}

/// Format a number with a format spec such as `.2f`, `.3e`, `.4g`, `%`
///
/// Returns `None` for specs that are not understood.
pub fn format_number(value: f64, spec: &str) -> Option<String> {
    let mut rest = spec.trim();
    let plus = rest.starts_with('+');
    if plus {
        rest = &rest[1..];
    }
    rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    let mut precision = None;
    if let Some(after_dot) = rest.strip_prefix('.') {
        let digits: String = after_dot.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        precision = Some(digits.parse::<usize>().ok()?);
        rest = &after_dot[digits.len()..];
    }

    let body = match rest {
        "f" | "F" => format!("{:.*}", precision.unwrap_or(6), value),
        "e" | "E" => format_exponent(value, precision.unwrap_or(6)),
        "%" => format!("{:.*}%", precision.unwrap_or(6), value * 100.0),
        "g" | "G" => format_general(value, precision.unwrap_or(6)),
        "" => match precision {
            Some(p) => format_general(value, p),
            None => format!("{}", value),
        },
        _ => return None,
    };

    if plus && value >= 0.0 {
        Some(format!("+{}", body))
    } else {
        Some(body)
    }
}

/// Scientific notation with a signed, two-digit exponent (`1.50e+03`)
fn format_exponent(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

/// `g`-style formatting: significant digits, trailing zeros removed
fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }
    let precision = precision.max(1);
    let exponent = value.abs().log10().floor() as i32;

    let text = if exponent < -4 || exponent >= precision as i32 {
        format_exponent(value, precision - 1)
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, value)
    };

    match text.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
        None => trim_zeros(&text).to_string(),
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Convert an integer to superscript Unicode characters
pub fn superscript(n: i32) -> String {
    const SUPERSCRIPTS: &[char] = &['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

    if n == 0 {
        return "⁰".to_string();
    }

    let mut result = String::new();
    let mut num = n.unsigned_abs();

    if n < 0 {
        result.push('⁻');
    }

    let mut digits = Vec::new();
    while num > 0 {
        digits.push(SUPERSCRIPTS[(num % 10) as usize]);
        num /= 10;
    }

    for digit in digits.into_iter().rev() {
        result.push(digit);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(ticks: &[TickMark]) -> Vec<f64> {
        ticks.iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_calculate_linear_ticks() {
        let ticks = calculate_ticks(Scale::Linear, (0.0, 10.0), 5, false);
        assert!(ticks.len() <= 5);
        assert_eq!(values(&ticks), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(ticks[1].label, "2.5");
        assert_eq!(ticks[2].label, "5.0");
    }

    #[test]
    fn test_prune_lower() {
        let ticks = calculate_ticks(Scale::Linear, (0.0, 10.0), 5, true);
        assert_eq!(values(&ticks), vec![2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_axis_state_ticks() {
        let mut axis = AxisState::new(AxisPosition::Bottom);
        axis.prune_lower = true;
        assert_eq!(values(&axis.ticks((0.0, 10.0))), vec![2.5, 5.0, 7.5, 10.0]);

        axis.show_ticks = false;
        assert!(axis.ticks((0.0, 10.0)).is_empty());
    }

    #[test]
    fn test_no_ticks() {
        assert!(calculate_ticks(Scale::Linear, (0.0, 1.0), 0, false).is_empty());
        assert!(calculate_ticks(Scale::Linear, (1.0, 1.0), 5, false).is_empty());
        assert!(calculate_ticks(Scale::Log, (-1.0, 10.0), 5, false).is_empty());
    }

    #[test]
    fn test_reversed_limits() {
        let ticks = calculate_ticks(Scale::Linear, (10.0, 0.0), 5, false);
        assert_eq!(ticks.first().unwrap().value, 0.0);
        assert!((ticks.first().unwrap().normalized - 1.0).abs() < 1e-12);
        assert!(ticks.last().unwrap().normalized.abs() < 1e-12);
    }

    #[test]
    fn test_calculate_log_ticks() {
        let ticks = calculate_ticks(Scale::Log, (1.0, 1000.0), 5, false);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks[3].label, "10³");
        assert!((ticks[1].normalized - 1.0 / 3.0).abs() < 1e-12);

        let wide = calculate_ticks(Scale::Log, (1e-3, 1e6), 5, false);
        assert_eq!(wide.len(), 5);
        assert_eq!(wide[0].label, "10⁻³");
    }

    #[test]
    fn test_log_ticks_without_decade_fall_back_to_linear() {
        let ticks = calculate_ticks(Scale::Log, (2.0, 8.0), 4, false);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.value >= 2.0 && t.value <= 8.0));
        assert!(ticks.iter().all(|t| (0.0..=1.0).contains(&t.normalized)));
    }

    #[test]
    fn test_axis_normalize() {
        let axis = AxisState::new(AxisPosition::Bottom).with_limits(0.0, 100.0);
        assert_eq!(axis.normalize(25.0), Some(0.25));

        let log = AxisState::new(AxisPosition::Left)
            .with_scale(Scale::Log)
            .with_limits(1.0, 100.0);
        assert!((log.normalize(10.0).unwrap() - 0.5).abs() < 1e-12);

        let flipped = AxisState::new(AxisPosition::Bottom).with_limits(1.0, 0.0);
        assert!(flipped.is_inverted());
        assert_eq!(flipped.normalize(1.0), Some(0.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(123.456, ".2f").unwrap(), "123.46");
        assert_eq!(format_number(2.0, ".0f").unwrap(), "2");
        assert_eq!(format_number(1500.0, ".2e").unwrap(), "1.50e+03");
        assert_eq!(format_number(0.00012, ".1e").unwrap(), "1.2e-04");
        assert_eq!(format_number(1234.5, ".3g").unwrap(), "1.23e+03");
        assert_eq!(format_number(0.25, ".3g").unwrap(), "0.25");
        assert_eq!(format_number(0.5, ".1%").unwrap(), "50.0%");
        assert_eq!(format_number(1.0, "+.1f").unwrap(), "+1.0");
        assert!(format_number(1.0, ".2q").is_none());
    }

    #[test]
    fn test_superscript() {
        assert_eq!(superscript(0), "⁰");
        assert_eq!(superscript(1), "¹");
        assert_eq!(superscript(-2), "⁻²");
        assert_eq!(superscript(12), "¹²");
    }

    #[test]
    fn test_scale_parse() {
        assert_eq!("log".parse::<Scale>().unwrap(), Scale::Log);
        assert_eq!("Linear".parse::<Scale>().unwrap(), Scale::Linear);
        assert!("symlog".parse::<Scale>().is_err());
        assert_eq!(Scale::Log.to_string(), "log");
    }
}
