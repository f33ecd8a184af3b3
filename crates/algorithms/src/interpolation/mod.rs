//! Grid interpolation algorithms
//!
//! Operate on grids in grid-index space:
//! - Thiessen: nearest-neighbor upscaling of a complete grid
//! - Bilinear: four-point weighted upscaling of a complete grid
//! - IDW: Inverse Distance Weighting fill of missing cells

mod bilinear;
pub mod distance;
mod idw;
mod thiessen;

pub use bilinear::{bilinear_upscale, BilinearUpscale};
pub use distance::{k_nearest, nearest, nearest_source_index, DistanceMetric, Euclidean, Neighbor};
pub use idw::{idw_fill, IdwFill, IdwParams};
pub use thiessen::{thiessen_upscale, ThiessenUpscale};

use ndarray::Array2;
use pointgrid_core::{Error, Grid, Result};

/// Parameters shared by the upscalers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpscaleParams {
    /// Output cells per source cell along each axis (>= 1)
    pub factor: usize,
}

impl Default for UpscaleParams {
    fn default() -> Self {
        Self { factor: 7 }
    }
}

/// Check an upscaling request and extract the source values.
///
/// Returns the dense source values and the output shape (rows, cols).
pub(crate) fn upscale_source(
    grid: &Grid,
    params: &UpscaleParams,
) -> Result<(Array2<f64>, (usize, usize))> {
    if params.factor < 1 {
        return Err(Error::invalid_input("factor", params.factor, "must be >= 1"));
    }
    if !grid.is_complete() {
        return Err(Error::invalid_input(
            "grid",
            format!("{} missing of {} cells", grid.missing_count(), grid.len()),
            "upscaling requires a complete grid",
        ));
    }

    let (rows, cols) = grid.shape();
    let out_rows = rows.checked_mul(params.factor);
    let out_cols = cols.checked_mul(params.factor);
    let shape = match (out_rows, out_cols) {
        (Some(r), Some(c)) if r.checked_mul(c).is_some() => (r, c),
        _ => {
            return Err(Error::invalid_input(
                "factor",
                params.factor,
                "upscaled grid size overflows",
            ))
        }
    };

    // Completeness was checked above
    let values = grid.data().map(|cell| cell.unwrap_or_default());
    Ok((values, shape))
}
