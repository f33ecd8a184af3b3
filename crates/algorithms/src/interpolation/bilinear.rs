//! Bilinear upscaling
//!
//! Each output cell is the weighted average of the four source cells around
//! its back-mapped position, with weights linear in each axis.

use pointgrid_core::{Algorithm, Error, Grid, Result};

use super::{upscale_source, UpscaleParams};

/// Bilinear upscaling algorithm
#[derive(Debug, Clone, Default)]
pub struct BilinearUpscale;

impl Algorithm for BilinearUpscale {
    type Input = Grid;
    type Output = Grid;
    type Params = UpscaleParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Bilinear"
    }

    fn description(&self) -> &'static str {
        "Four-point weighted-average upscaling of a complete grid"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        bilinear_upscale(&input, params)
    }
}

/// Lower source index, upper source index and fractional offset for every
/// output index along one axis.
fn axis_samples(out_len: usize, factor: usize, len: usize) -> Vec<(usize, usize, f64)> {
    (0..out_len)
        .map(|i| {
            let i0 = (i / factor).min(len - 1);
            let i1 = (i0 + 1).min(len - 1);
            let t = (i % factor) as f64 / factor as f64;
            (i0, i1, t)
        })
        .collect()
}

/// Upscale a complete grid by bilinear interpolation.
///
/// # Algorithm
///
/// Output cell `(r, c)` maps to source position `(y, x) = (r / f, c / f)`.
/// With `r0 = floor(y)`, `c0 = floor(x)`, `ty = y - r0`, `tx = x - c0`:
///
/// ```text
/// z = (1-tx)(1-ty)·v00 + tx(1-ty)·v10 + (1-tx)ty·v01 + tx·ty·v11
/// ```
///
/// where `v10` is the next column and `v01` the next row. Past the last
/// source row or column the neighbor index is clamped to the edge.
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
pub fn bilinear_upscale(grid: &Grid, params: UpscaleParams) -> Result<Grid> {
    let (values, (out_rows, out_cols)) = upscale_source(grid, &params)?;
    let (rows, cols) = values.dim();
    let factor = params.factor;

    let row_samples = axis_samples(out_rows, factor, rows);
    let col_samples = axis_samples(out_cols, factor, cols);

    let mut data = Vec::with_capacity(out_rows * out_cols);
    for &(r0, r1, ty) in &row_samples {
        for &(c0, c1, tx) in &col_samples {
            let v00 = values[(r0, c0)];
            let v10 = values[(r0, c1)];
            let v01 = values[(r1, c0)];
            let v11 = values[(r1, c1)];

            let z = (1.0 - tx) * (1.0 - ty) * v00
                + tx * (1.0 - ty) * v10
                + (1.0 - tx) * ty * v01
                + tx * ty * v11;
            data.push(Some(z));
        }
    }

    let mut output = Grid::from_vec(data, out_rows, out_cols)?;
    output.set_transform(grid.transform().upscaled(factor));

    Ok(output)
}
