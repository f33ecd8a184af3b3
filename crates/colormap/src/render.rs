//! Grid-to-RGBA rendering using color schemes.

use pointgrid_core::Grid;
use serde::{Deserialize, Serialize};

use crate::scheme::{evaluate, ColorScheme, Rgb};

/// Which image row grid row 0 lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Row 0 at the bottom, as in a plot with y growing upward
    #[default]
    Lower,
    /// Row 0 at the top
    Upper,
}

/// Parameters for colormap rendering.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    /// Color scheme to use.
    pub scheme: ColorScheme,
    /// Minimum value for normalization. Values below this are clamped.
    pub min: f64,
    /// Maximum value for normalization. Values above this are clamped.
    pub max: f64,
    /// Color for missing cells (RGBA). Default: fully transparent.
    pub nodata_color: [u8; 4],
    pub origin: Origin,
    /// Append a vertical color ramp to the right of the image.
    pub legend: bool,
}

impl ColormapParams {
    /// Create params with the given scheme; min/max must be set separately
    /// or use [`auto_params`] to detect from data.
    pub fn new(scheme: ColorScheme) -> Self {
        Self::with_range(scheme, 0.0, 1.0)
    }

    /// Create params with explicit min/max range.
    pub fn with_range(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self {
            scheme,
            min,
            max,
            nodata_color: [0, 0, 0, 0],
            origin: Origin::default(),
            legend: false,
        }
    }

    /// Map a value to its opaque pixel.
    pub fn color(&self, value: f64) -> [u8; 4] {
        let range = self.max - self.min;
        let t = if range.abs() > f64::EPSILON {
            (value - self.min) / range
        } else {
            0.0
        };
        let Rgb { r, g, b } = evaluate(self.scheme, t);
        [r, g, b, 255]
    }
}

/// Auto-detect min/max from a grid, returning `ColormapParams` ready to use.
///
/// Scans all known cells. An all-missing grid gets `[0, 1]`; a constant
/// grid gets `[v, v + 1]`.
pub fn auto_params(grid: &Grid, scheme: ColorScheme) -> ColormapParams {
    let (min, max) = match grid.value_range() {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo, lo + 1.0),
        Some(range) => range,
    };
    ColormapParams::with_range(scheme, min, max)
}

/// Convert a grid to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4`, one image row after the
/// other, with image rows ordered according to `params.origin`.
///
/// Missing cells are rendered with `params.nodata_color`.
pub fn grid_to_rgba(grid: &Grid, params: &ColormapParams) -> Vec<u8> {
    let (rows, cols) = grid.shape();
    let mut rgba = vec![0u8; rows * cols * 4];

    for ((row, col), cell) in grid.data().indexed_iter() {
        let image_row = match params.origin {
            Origin::Lower => rows - 1 - row,
            Origin::Upper => row,
        };
        let offset = (image_row * cols + col) * 4;

        let pixel = match cell {
            Some(v) => params.color(*v),
            None => params.nodata_color,
        };
        rgba[offset..offset + 4].copy_from_slice(&pixel);
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_to_rgba_basic() {
        let grid = Grid::from_vec(vec![Some(0.0), Some(0.5), Some(1.0), None], 2, 2).unwrap();

        let mut params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 1.0);
        params.origin = Origin::Upper;
        let rgba = grid_to_rgba(&grid, &params);

        assert_eq!(rgba.len(), 16); // 4 pixels * 4 bytes

        // (0,0) = 0.0 -> black, opaque
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        // (0,1) = 0.5 -> gray, opaque
        assert_eq!(&rgba[4..8], &[128, 128, 128, 255]);
        // (1,0) = 1.0 -> white, opaque
        assert_eq!(&rgba[8..12], &[255, 255, 255, 255]);
        // (1,1) missing -> transparent
        assert_eq!(&rgba[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn lower_origin_flips_rows() {
        let grid = Grid::from_values(vec![0.0, 1.0], 2, 1).unwrap();
        let params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 1.0);
        assert_eq!(params.origin, Origin::Lower);

        let rgba = grid_to_rgba(&grid, &params);
        // Row 0 (value 0) is the last image row
        assert_eq!(&rgba[0..4], &[255, 255, 255, 255]);
        assert_eq!(&rgba[4..8], &[0, 0, 0, 255]);
    }

    #[test]
    fn custom_nodata_color() {
        let grid = Grid::new(1, 1).unwrap();
        let mut params = ColormapParams::new(ColorScheme::Viridis);
        params.nodata_color = [255, 0, 255, 255];
        assert_eq!(grid_to_rgba(&grid, &params), vec![255, 0, 255, 255]);
    }

    #[test]
    fn auto_params_range() {
        let grid = Grid::from_vec(vec![Some(10.0), None, Some(50.0), Some(100.0)], 1, 4).unwrap();

        let params = auto_params(&grid, ColorScheme::Grayscale);
        assert!((params.min - 10.0).abs() < f64::EPSILON);
        assert!((params.max - 100.0).abs() < f64::EPSILON);
        assert_eq!(params.scheme, ColorScheme::Grayscale);
    }

    #[test]
    fn auto_params_all_missing() {
        let grid = Grid::new(2, 1).unwrap();
        let params = auto_params(&grid, ColorScheme::Grayscale);
        assert!((params.min - 0.0).abs() < f64::EPSILON);
        assert!((params.max - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn auto_params_constant_grid() {
        let grid = Grid::from_values(vec![42.0; 4], 2, 2).unwrap();
        let params = auto_params(&grid, ColorScheme::Grayscale);
        assert!((params.min - 42.0).abs() < f64::EPSILON);
        assert!((params.max - 43.0).abs() < f64::EPSILON);
    }

    #[test]
    fn values_outside_range_are_clamped() {
        let params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 10.0);
        assert_eq!(params.color(-5.0), [0, 0, 0, 255]);
        assert_eq!(params.color(50.0), [255, 255, 255, 255]);
    }
}
