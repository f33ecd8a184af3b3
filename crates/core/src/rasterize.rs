//! Binning of scattered points into a grid
//!
//! Point files sampled on a (possibly gappy) regular lattice are turned into
//! a grid by giving every distinct x coordinate its own column and every
//! distinct y coordinate its own row. Lattice positions without a sample
//! stay missing.

use crate::error::{Error, Result};
use crate::points::PointSet;
use crate::raster::{GeoTransform, Grid};
use tracing::debug;

/// Parameters for rasterization
#[derive(Debug, Clone, Default)]
pub struct RasterizeParams {
    /// Coordinates closer than this along an axis share a row or column.
    /// `0.0` requires exact equality.
    pub tolerance: f64,
}

/// Rasterize a point set onto the lattice spanned by its coordinates.
///
/// Row 0 holds the smallest y, column 0 the smallest x. The returned grid
/// carries a transform whose cell size is the mean spacing of the distinct
/// coordinates, with its origin at the lower-left cell corner.
///
/// When two points land in the same cell, the later one wins.
pub fn rasterize(points: &PointSet, params: &RasterizeParams) -> Result<Grid> {
    if !(params.tolerance >= 0.0 && params.tolerance.is_finite()) {
        return Err(Error::invalid_input(
            "tolerance",
            params.tolerance,
            "must be a finite value >= 0",
        ));
    }

    let xs = distinct_sorted(points.iter().map(|p| p.x), params.tolerance);
    let ys = distinct_sorted(points.iter().map(|p| p.y), params.tolerance);

    let mut grid = Grid::new(xs.len(), ys.len())?;
    let mut overwritten = 0usize;

    for p in points {
        let col = axis_index(&xs, p.x, params.tolerance)?;
        let row = axis_index(&ys, p.y, params.tolerance)?;
        if grid.get(row, col)?.is_some() {
            overwritten += 1;
        }
        grid.set(row, col, p.z)?;
    }

    if overwritten > 0 {
        debug!("{} points overwrote an earlier sample in the same cell", overwritten);
    }

    let dx = mean_spacing(&xs);
    let dy = mean_spacing(&ys);
    grid.set_transform(GeoTransform::new(xs[0] - dx / 2.0, ys[0] - dy / 2.0, dx, dy));

    debug!(
        "Rasterized {} points into {} x {} grid ({} missing)",
        points.len(),
        grid.cols(),
        grid.rows(),
        grid.missing_count()
    );

    Ok(grid)
}

/// Sorted coordinate values with runs closer than `tolerance` collapsed
/// onto their first member.
fn distinct_sorted(values: impl Iterator<Item = f64>, tolerance: f64) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);

    let mut distinct: Vec<f64> = Vec::with_capacity(sorted.len());
    for v in sorted {
        match distinct.last() {
            Some(&last) if v - last <= tolerance => {}
            _ => distinct.push(v),
        }
    }
    distinct
}

fn axis_index(distinct: &[f64], value: f64, tolerance: f64) -> Result<usize> {
    // Run starts are more than `tolerance` apart, so the run holding
    // `value` is the last one starting at or below it
    let idx = distinct.partition_point(|&d| d <= value).checked_sub(1);

    match idx {
        Some(i) if value - distinct[i] <= tolerance => Ok(i),
        _ => Err(Error::InsufficientData(format!(
            "coordinate {} does not fall on the point lattice",
            value
        ))),
    }
}

fn mean_spacing(distinct: &[f64]) -> f64 {
    match distinct {
        [first, .., last] => (last - first) / (distinct.len() - 1) as f64,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::SamplePoint;
    use approx::assert_relative_eq;

    fn points(samples: &[(f64, f64, f64)]) -> PointSet {
        PointSet::new(samples.iter().map(|&(x, y, z)| SamplePoint::new(x, y, z)).collect())
            .unwrap()
    }

    #[test]
    fn full_lattice_is_complete() {
        let set = points(&[
            (10.0, 100.0, 1.0),
            (20.0, 100.0, 2.0),
            (10.0, 110.0, 3.0),
            (20.0, 110.0, 4.0),
        ]);
        let grid = rasterize(&set, &RasterizeParams::default()).unwrap();

        assert_eq!(grid.dimensions(), (2, 2));
        assert!(grid.is_complete());
        // Row 0 is the smallest y
        assert_eq!(grid.get(0, 0).unwrap(), Some(1.0));
        assert_eq!(grid.get(0, 1).unwrap(), Some(2.0));
        assert_eq!(grid.get(1, 0).unwrap(), Some(3.0));
        assert_eq!(grid.get(1, 1).unwrap(), Some(4.0));
    }

    #[test]
    fn gaps_become_missing() {
        let set = points(&[(0.0, 0.0, 5.0), (1.0, 1.0, 8.0)]);
        let grid = rasterize(&set, &RasterizeParams::default()).unwrap();

        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(0, 0).unwrap(), Some(5.0));
        assert_eq!(grid.get(0, 1).unwrap(), None);
        assert_eq!(grid.get(1, 0).unwrap(), None);
        assert_eq!(grid.get(1, 1).unwrap(), Some(8.0));
    }

    #[test]
    fn input_order_does_not_matter() {
        let set = points(&[(3.0, 0.0, 3.0), (1.0, 0.0, 1.0), (2.0, 0.0, 2.0)]);
        let grid = rasterize(&set, &RasterizeParams::default()).unwrap();

        assert_eq!(grid.dimensions(), (3, 1));
        for col in 0..3 {
            assert_eq!(grid.get(0, col).unwrap(), Some((col + 1) as f64));
        }
    }

    #[test]
    fn transform_matches_lattice() {
        let set = points(&[(100.0, 50.0, 0.0), (125.0, 50.0, 0.0), (150.0, 75.0, 0.0)]);
        let grid = rasterize(&set, &RasterizeParams::default()).unwrap();

        assert_relative_eq!(grid.cell_size(), 25.0);
        let (x, y) = grid.cell_center(1, 2);
        assert_relative_eq!(x, 150.0, epsilon = 1e-9);
        assert_relative_eq!(y, 75.0, epsilon = 1e-9);
    }

    #[test]
    fn single_point_grid() {
        let grid = rasterize(&points(&[(7.0, 9.0, 1.5)]), &RasterizeParams::default()).unwrap();
        assert_eq!(grid.dimensions(), (1, 1));
        assert!(grid.is_complete());
        assert_relative_eq!(grid.cell_size(), 1.0);
    }

    #[test]
    fn tolerance_merges_jittered_coordinates() {
        let set = points(&[(0.0, 0.0, 1.0), (1.0000001, 0.0, 2.0), (0.9999999, 1.0, 3.0)]);

        let exact = rasterize(&set, &RasterizeParams::default()).unwrap();
        assert_eq!(exact.dimensions(), (3, 2));

        let snapped = rasterize(&set, &RasterizeParams { tolerance: 1e-3 }).unwrap();
        assert_eq!(snapped.dimensions(), (2, 2));
        assert_eq!(snapped.get(1, 1).unwrap(), Some(3.0));
    }

    #[test]
    fn tolerance_keeps_points_in_their_run() {
        // 1.0 joins the run starting at 0.0; 1.5 starts the next one
        let set = points(&[(0.0, 0.0, 1.0), (1.0, 0.0, 2.0), (1.5, 0.0, 3.0)]);
        let grid = rasterize(&set, &RasterizeParams { tolerance: 1.0 }).unwrap();

        assert_eq!(grid.dimensions(), (2, 1));
        assert_eq!(grid.get(0, 0).unwrap(), Some(2.0));
        assert_eq!(grid.get(0, 1).unwrap(), Some(3.0));
    }

    #[test]
    fn duplicate_cell_keeps_last_value() {
        let set = points(&[(0.0, 0.0, 1.0), (0.0, 0.0, 2.0)]);
        let grid = rasterize(&set, &RasterizeParams::default()).unwrap();
        assert_eq!(grid.get(0, 0).unwrap(), Some(2.0));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let set = points(&[(0.0, 0.0, 1.0)]);
        assert!(rasterize(&set, &RasterizeParams { tolerance: -1.0 }).is_err());
    }
}
