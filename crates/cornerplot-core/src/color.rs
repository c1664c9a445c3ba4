//! Colors and colormaps for corner plots
//!
//! Colors can be written the way plotting users are used to:
//! - hex strings: `#4682b4`, `#fff`, `#4682b480`
//! - single-letter codes: `b g r c m y k w`
//! - the default property cycle: `C0` .. `C9`
//! - a handful of CSS names (`steelblue`, `black`, ...)
//!
//! The corner-specific colormaps are built from the main plot color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Hex codes of the default ten-color property cycle
const CYCLE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from hex string (`#RRGGBB`, `#RRGGBBAA` or `#RGB`)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        // Byte slicing below needs ASCII; this also rejects a leading '+'
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Convert to hex string (alpha appended when not opaque)
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// 8-bit RGB channels
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (byte(self.r), byte(self.g), byte(self.b))
    }

    /// Whether the color draws nothing
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Error returned when a color string cannot be understood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color specification: '{0}'")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let err = || ParseColorError(s.to_string());

        if spec.starts_with('#') {
            return Color::from_hex(spec).ok_or_else(err);
        }

        let lower = spec.to_lowercase();
        if let Some(idx) = lower.strip_prefix('c').and_then(|d| d.parse::<usize>().ok()) {
            return Color::from_hex(CYCLE[idx % CYCLE.len()]).ok_or_else(err);
        }

        let named = match lower.as_str() {
            "b" | "blue" => Color::rgb(0.0, 0.0, 1.0),
            "g" => Color::rgb(0.0, 0.5, 0.0),
            "green" => Color::rgb(0.0, 128.0 / 255.0, 0.0),
            "r" | "red" => Color::rgb(1.0, 0.0, 0.0),
            "c" | "cyan" => Color::rgb(0.0, 0.75, 0.75),
            "m" | "magenta" => Color::rgb(0.75, 0.0, 0.75),
            "y" | "yellow" => Color::rgb(0.75, 0.75, 0.0),
            "k" | "black" => Color::BLACK,
            "w" | "white" => Color::WHITE,
            "gray" | "grey" => Color::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0),
            "orange" => Color::rgb(1.0, 165.0 / 255.0, 0.0),
            "purple" => Color::rgb(128.0 / 255.0, 0.0, 128.0 / 255.0),
            "steelblue" => Color::rgb(70.0 / 255.0, 130.0 / 255.0, 180.0 / 255.0),
            "none" | "transparent" => Color::new(0.0, 0.0, 0.0, 0.0),
            _ => return Color::from_hex(&lower).ok_or_else(err),
        };
        Ok(named)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A colormap for mapping scalar values to colors
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Name of the colormap
    pub name: String,
    /// Color stops (positions from 0.0 to 1.0)
    stops: Vec<(f32, Color)>,
    /// Whether the colormap is reversed
    reversed: bool,
}

impl Colormap {
    /// Create a new colormap from a list of colors (evenly spaced)
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        let n = colors.len();
        let stops: Vec<(f32, Color)> = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / (n - 1).max(1) as f32, c))
            .collect();

        Self {
            name: name.into(),
            stops,
            reversed: false,
        }
    }

    /// Reverse the colormap
    pub fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, mut t: f32) -> Color {
        t = t.clamp(0.0, 1.0);
        if self.reversed {
            t = 1.0 - t;
        }

        match self.stops.len() {
            0 => return Color::default(),
            1 => return self.stops[0].1,
            _ => {}
        }

        for pair in self.stops.windows(2) {
            let (t0, c0) = &pair[0];
            let (t1, c1) = &pair[1];
            if t >= *t0 && t <= *t1 {
                let local_t = (t - t0) / (t1 - t0);
                return Color::lerp(c0, c1, local_t);
            }
        }

        self.stops.last().map(|(_, c)| *c).unwrap_or_default()
    }

    /// Generate a lookup table of the specified size
    pub fn generate_lut(&self, size: usize) -> Vec<Color> {
        (0..size)
            .map(|i| self.sample(i as f32 / (size - 1).max(1) as f32))
            .collect()
    }
}

/// Density shading: full `color` at 0, fading to transparent white at 1
pub fn density_colormap(color: Color) -> Colormap {
    Colormap::from_colors(
        "density",
        vec![color, Color::new(1.0, 1.0, 1.0, 0.0)],
    )
}

/// Fill colors for the bands between `n_levels` contour levels
///
/// Returns `n_levels + 1` colors: band `i` below the last level gets alpha
/// `i / (n_levels + 1)`, the innermost band is fully opaque.
pub fn contour_fill_colors(color: Color, n_levels: usize) -> Vec<Color> {
    let base = color.a;
    (0..=n_levels)
        .map(|i| {
            if i < n_levels {
                color.with_alpha(base * i as f32 / (n_levels + 1) as f32)
            } else {
                color
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#FF5733").unwrap();
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.341).abs() < 0.01);
        assert!((color.b - 0.2).abs() < 0.01);

        let short = Color::from_hex("#fff").unwrap();
        assert_eq!(short, Color::WHITE);
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn test_non_ascii_hex_is_an_error() {
        // 'é' is two bytes, so this has the byte length of "#rgb"
        assert!(Color::from_hex("#éa").is_none());
        assert!(Color::from_hex("#ffé0").is_none());
        assert!(Color::from_hex("#+ff").is_none());
        assert_eq!(
            "#éa".parse::<Color>(),
            Err(ParseColorError("#éa".to_string()))
        );
    }

    #[test]
    fn test_parse_letters_and_cycle() {
        assert_eq!("k".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("g".parse::<Color>().unwrap(), Color::rgb(0.0, 0.5, 0.0));
        assert_eq!("C1".parse::<Color>().unwrap().to_hex(), "#ff7f0e");
        assert_eq!("c2".parse::<Color>().unwrap().to_hex(), "#2ca02c");
        assert_eq!("#4682b4".parse::<Color>().unwrap().to_hex(), "#4682b4");
        assert_eq!(
            "steelblue".parse::<Color>().unwrap().to_hex(),
            "#4682b4"
        );
        assert!("notacolor".parse::<Color>().is_err());
    }

    #[test]
    fn test_hex_roundtrip_with_alpha() {
        let c = Color::rgb(1.0, 0.0, 0.0).with_alpha(0.5);
        let parsed: Color = c.to_hex().parse().unwrap();
        assert!((parsed.a - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_serde_as_string() {
        let c: Color = serde_json::from_str("\"C0\"").unwrap();
        assert_eq!(c.to_hex(), "#1f77b4");
        assert_eq!(serde_json::to_string(&Color::WHITE).unwrap(), "\"#ffffff\"");
        assert!(serde_json::from_str::<Color>("\"bogus\"").is_err());
    }

    #[test]
    fn test_color_lerp() {
        let a = Color::rgb(0.0, 0.0, 0.0);
        let b = Color::rgb(1.0, 1.0, 1.0);
        let mid = Color::lerp(&a, &b, 0.5);

        assert!((mid.r - 0.5).abs() < 0.001);
        assert!((mid.g - 0.5).abs() < 0.001);
        assert!((mid.b - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_density_colormap_fades_out() {
        let cmap = density_colormap(Color::BLACK);
        assert_eq!(cmap.sample(0.0), Color::BLACK);
        assert!(cmap.sample(1.0).is_transparent());
        assert!((cmap.sample(0.5).a - 0.5).abs() < 1e-6);

        let rev = density_colormap(Color::BLACK).reversed();
        assert!(rev.sample(0.0).is_transparent());
    }

    #[test]
    fn test_contour_fill_colors() {
        let colors = contour_fill_colors(Color::rgb(0.0, 0.5, 0.0), 4);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0].a, 0.0);
        assert!((colors[2].a - 0.4).abs() < 1e-6);
        assert_eq!(colors[4].a, 1.0);
        assert!(colors.windows(2).all(|w| w[0].a <= w[1].a));
    }

    #[test]
    fn test_generate_lut() {
        let lut = density_colormap(Color::BLACK).generate_lut(16);
        assert_eq!(lut.len(), 16);
    }
}
