//! Thiessen (nearest neighbor) upscaling
//!
//! Each output cell takes the value of the closest source cell, producing a
//! blocky, Voronoi-like enlargement that never invents new values.

use pointgrid_core::{Algorithm, Error, Grid, Result};

use super::distance::nearest_source_index;
use super::{upscale_source, UpscaleParams};

/// Thiessen upscaling algorithm
#[derive(Debug, Clone, Default)]
pub struct ThiessenUpscale;

impl Algorithm for ThiessenUpscale {
    type Input = Grid;
    type Output = Grid;
    type Params = UpscaleParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Thiessen"
    }

    fn description(&self) -> &'static str {
        "Nearest-neighbor upscaling of a complete grid"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        thiessen_upscale(&input, params)
    }
}

/// Upscale a complete grid by nearest-neighbor assignment.
///
/// Output cell `(r, c)` maps back to source position
/// `(r / factor, c / factor)` and copies the nearest source cell; exact ties
/// go to the smaller row, then the smaller column.
///
/// # Arguments
/// * `grid` - Complete source grid (`W x H`)
/// * `params` - Upscaling factor (>= 1)
///
/// # Returns
/// A new `W*factor x H*factor` grid covering the same extent
///
/// # Errors
/// `InvalidInput` if the grid has missing cells or `factor < 1`
pub fn thiessen_upscale(grid: &Grid, params: UpscaleParams) -> Result<Grid> {
    let (values, (out_rows, out_cols)) = upscale_source(grid, &params)?;
    let (rows, cols) = values.dim();
    let factor = params.factor;

    let src_cols: Vec<usize> = (0..out_cols)
        .map(|c| nearest_source_index(c, factor, cols))
        .collect();

    let mut data = Vec::with_capacity(out_rows * out_cols);
    for r in 0..out_rows {
        let src_row = values.row(nearest_source_index(r, factor, rows));
        data.extend(src_cols.iter().map(|&c| Some(src_row[c])));
    }

    let mut output = Grid::from_vec(data, out_rows, out_cols)?;
    output.set_transform(grid.transform().upscaled(factor));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_1234() -> Grid {
        Grid::from_values(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap()
    }

    #[test]
    fn test_thiessen_quadrant_blocks() {
        let result = thiessen_upscale(&grid_1234(), UpscaleParams { factor: 2 }).unwrap();
        assert_eq!(result.dimensions(), (4, 4));

        let expected = [
            [1.0, 1.0, 2.0, 2.0],
            [1.0, 1.0, 2.0, 2.0],
            [3.0, 3.0, 4.0, 4.0],
            [3.0, 3.0, 4.0, 4.0],
        ];
        for (row, line) in expected.iter().enumerate() {
            for (col, &v) in line.iter().enumerate() {
                assert_eq!(result.get(row, col).unwrap(), Some(v), "at ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_thiessen_identity() {
        let grid = grid_1234();
        let result = thiessen_upscale(&grid, UpscaleParams { factor: 1 }).unwrap();
        assert_eq!(result, grid);
    }

    #[test]
    fn test_thiessen_rounds_to_nearest() {
        let grid = Grid::from_values(vec![10.0, 20.0, 30.0], 1, 3).unwrap();
        let result = thiessen_upscale(&grid, UpscaleParams { factor: 7 }).unwrap();
        assert_eq!(result.dimensions(), (21, 7));

        let row: Vec<f64> = (0..21).map(|c| result.get(0, c).unwrap().unwrap()).collect();
        // 0..=3 -> first, 4..=10 -> second, 11.. -> third
        assert!(row[..4].iter().all(|&v| v == 10.0));
        assert!(row[4..11].iter().all(|&v| v == 20.0));
        assert!(row[11..].iter().all(|&v| v == 30.0));
    }

    #[test]
    fn test_thiessen_does_not_touch_input() {
        let grid = grid_1234();
        let copy = grid.clone();
        let _ = thiessen_upscale(&grid, UpscaleParams { factor: 3 }).unwrap();
        assert_eq!(grid, copy);
    }

    #[test]
    fn test_thiessen_rejects_incomplete() {
        let grid = Grid::from_vec(vec![Some(1.0), None], 1, 2).unwrap();
        let err = thiessen_upscale(&grid, UpscaleParams { factor: 2 }).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { name: "grid", .. }));
    }

    #[test]
    fn test_thiessen_rejects_zero_factor() {
        let err = thiessen_upscale(&grid_1234(), UpscaleParams { factor: 0 }).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { name: "factor", .. }));
    }

    #[test]
    fn test_thiessen_algorithm_trait() {
        let algo = ThiessenUpscale;
        assert_eq!(algo.name(), "Thiessen");
        let result = algo.execute_default(grid_1234()).unwrap();
        assert_eq!(result.dimensions(), (14, 14));
    }
}
