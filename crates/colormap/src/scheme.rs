//! Color schemes.

use std::fmt;
use std::str::FromStr;

use pointgrid_core::Error;
use serde::{Deserialize, Serialize};

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Dark purple -> Teal -> Yellow (perceptually uniform)
    #[default]
    Viridis,
    /// Black -> White
    Grayscale,
}

impl ColorScheme {
    pub const ALL: &'static [ColorScheme] = &[Self::Viridis, Self::Grayscale];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Viridis => "Viridis",
            Self::Grayscale => "Grayscale",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "viridis" => Ok(Self::Viridis),
            "grayscale" | "greyscale" | "gray" => Ok(Self::Grayscale),
            _ => Err(Error::invalid_input("scheme", s, "use viridis or grayscale")),
        }
    }
}

/// Viridis sampled at nine evenly spaced positions.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Piecewise-linear lookup in a table of evenly spaced colors.
fn sample(table: &[[u8; 3]], t: f64) -> Rgb {
    let last = table.len() - 1;
    let x = t * last as f64;
    let i = (x.floor() as usize).min(last.saturating_sub(1));
    let frac = x - i as f64;
    let lo = table[i];
    let hi = table[(i + 1).min(last)];

    let channel = |k: usize| {
        let (a, b) = (f64::from(lo[k]), f64::from(hi[k]));
        (a + (b - a) * frac).round() as u8
    };
    Rgb::new(channel(0), channel(1), channel(2))
}

/// Evaluate a color scheme at normalized position `t` ∈ [0, 1].
///
/// Values outside the unit interval are clamped to the end colors. NaN maps
/// to the first color.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match scheme {
        ColorScheme::Viridis => sample(&VIRIDIS, t),
        ColorScheme::Grayscale => {
            let v = (t * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
    }
}
