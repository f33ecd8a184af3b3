//! PNG output.

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use pointgrid_core::{Error, Grid, Result};

use crate::render::{grid_to_rgba, ColormapParams};
use crate::scheme::evaluate;

/// Transparent columns between the grid and the legend ramp.
const LEGEND_GAP: u32 = 2;

fn legend_width(cols: u32) -> u32 {
    (cols / 10).clamp(4, 32)
}

fn to_u32(name: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::invalid_input(name, value, "too large for an image"))
}

/// Render a grid into an RGBA image, with the legend ramp when requested.
///
/// One pixel per cell. The ramp runs from `params.max` at the top to
/// `params.min` at the bottom.
pub fn render_image(grid: &Grid, params: &ColormapParams) -> Result<RgbaImage> {
    let width = to_u32("width", grid.cols())?;
    let height = to_u32("height", grid.rows())?;

    let pixels = grid_to_rgba(grid, params);
    let body = RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| Error::Image(format!("buffer does not match {}x{}", width, height)))?;

    if !params.legend {
        return Ok(body);
    }

    let ramp = legend_width(width);
    let mut image = RgbaImage::new(width + LEGEND_GAP + ramp, height);
    image::imageops::replace(&mut image, &body, 0, 0);

    for y in 0..height {
        let t = if height > 1 {
            1.0 - y as f64 / (height - 1) as f64
        } else {
            0.5
        };
        let c = evaluate(params.scheme, t);
        for x in 0..ramp {
            image.put_pixel(width + LEGEND_GAP + x, y, Rgba([c.r, c.g, c.b, 255]));
        }
    }

    Ok(image)
}

/// Render a grid and write it as a PNG file.
///
/// The parent directory must exist.
pub fn save_png<P: AsRef<Path>>(grid: &Grid, params: &ColormapParams, path: P) -> Result<()> {
    let image = render_image(grid, params)?;
    image
        .save_with_format(path.as_ref(), ImageFormat::Png)
        .map_err(|e| Error::Image(format!("{}: {}", path.as_ref().display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorScheme, Origin};

    fn params(legend: bool) -> ColormapParams {
        let mut p = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 3.0);
        p.origin = Origin::Upper;
        p.legend = legend;
        p
    }

    #[test]
    fn image_matches_grid_shape() {
        let grid = Grid::from_values(vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0], 2, 3).unwrap();
        let image = render_image(&grid, &params(false)).unwrap();

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn legend_ramp_runs_max_to_min() {
        let grid = Grid::from_values(vec![0.0; 20], 5, 4).unwrap();
        let image = render_image(&grid, &params(true)).unwrap();

        assert_eq!(image.dimensions(), (4 + LEGEND_GAP + 4, 5));
        // Gap stays transparent
        assert_eq!(image.get_pixel(4, 0)[3], 0);
        // Top of the ramp is the maximum color, bottom the minimum
        let x = 4 + LEGEND_GAP;
        assert_eq!(image.get_pixel(x, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(x, 4), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn save_png_writes_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let grid = Grid::from_vec(vec![Some(1.0), None, Some(2.0), Some(3.0)], 2, 2).unwrap();

        save_png(&grid, &params(false), &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 0)[3], 0);
        assert_eq!(decoded.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn save_png_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("grid.png");
        let grid = Grid::from_values(vec![1.0], 1, 1).unwrap();

        assert!(matches!(
            save_png(&grid, &params(false), &path),
            Err(Error::Image(_))
        ));
    }
}
