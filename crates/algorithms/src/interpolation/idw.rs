//! Inverse Distance Weighting (IDW) gap filling
//!
//! Estimates each missing cell as a weighted average of its nearest known
//! cells, where weights are inversely proportional to distance raised to a
//! power parameter. Known cells are left untouched.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use pointgrid_core::{Algorithm, Error, Grid, Result};
use tracing::debug;

use super::distance::{k_nearest, Euclidean, Neighbor};

/// Parameters for IDW gap filling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdwParams {
    /// Number of nearest known cells used per estimate (>= 1).
    /// Reduced to the number of known cells when the grid has fewer.
    pub k_neighbors: usize,
    /// Power parameter (default: 2.0).
    /// Higher values give more weight to nearby cells.
    pub power: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            k_neighbors: 4,
            power: 2.0,
        }
    }
}

impl IdwParams {
    pub fn validate(&self) -> Result<()> {
        if self.k_neighbors < 1 {
            return Err(Error::invalid_input("k_neighbors", self.k_neighbors, "must be >= 1"));
        }
        if !(self.power > 0.0 && self.power.is_finite()) {
            return Err(Error::invalid_input("power", self.power, "must be a finite value > 0"));
        }
        Ok(())
    }
}

/// IDW gap-filling algorithm
#[derive(Debug, Clone, Default)]
pub struct IdwFill;

impl Algorithm for IdwFill {
    type Input = Grid;
    type Output = Grid;
    type Params = IdwParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "IDW"
    }

    fn description(&self) -> &'static str {
        "Fill missing cells by k-nearest inverse distance weighting"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        idw_fill(&input, params)
    }
}

/// Fill the missing cells of a grid by IDW over the `k` nearest known cells.
///
/// # Algorithm
///
/// For each missing cell, with `d_i` the index-space distance to its i-th
/// nearest known cell (ties in row-major order):
///
/// ```text
/// z = Σ(wi * zi) / Σ(wi)
/// where wi = 1 / di^p
/// ```
///
/// # Arguments
/// * `grid` - Grid with at least one known cell
/// * `params` - Neighbor count and power
///
/// # Returns
/// A new, complete grid; known cells keep their values
///
/// # Errors
/// - `InvalidInput` if `k_neighbors < 1` or `power <= 0`
/// - `InsufficientData` if the grid has no known cell
pub fn idw_fill(grid: &Grid, params: IdwParams) -> Result<Grid> {
    params.validate()?;

    let known: Vec<(usize, usize, f64)> = grid.known_cells().collect();
    if known.is_empty() {
        return Err(Error::InsufficientData(format!(
            "IDW needs at least one known cell, grid of {} cells has none",
            grid.len()
        )));
    }

    let k = params.k_neighbors.min(known.len());
    if k < params.k_neighbors {
        debug!(
            "Only {} known cells, using k = {} instead of {}",
            known.len(),
            k,
            params.k_neighbors
        );
    }

    let missing: Vec<(usize, usize)> = grid
        .data()
        .indexed_iter()
        .filter(|(_, cell)| cell.is_none())
        .map(|(idx, _)| idx)
        .collect();

    let mut output = grid.clone();
    for &(row, col) in &missing {
        let neighbors = k_nearest(&Euclidean, (row, col), &known, k);
        output.set(row, col, weighted_average(&neighbors, params.power))?;
    }

    Ok(output)
}

/// IDW estimate from neighbors sorted nearest first (non-empty).
fn weighted_average(neighbors: &[Neighbor], power: f64) -> f64 {
    let d_min = neighbors[0].distance;
    if d_min == 0.0 {
        return neighbors[0].value;
    }

    // Weights scaled by d_min^p keep the nearest weight at 1 and avoid
    // underflow for large powers; the ratio is unchanged.
    let mut sum_w = 0.0;
    let mut sum_wz = 0.0;
    for n in neighbors {
        let w = (d_min / n.distance).powf(power);
        sum_w += w;
        sum_wz += w * n.value;
    }

    sum_wz / sum_w
}
