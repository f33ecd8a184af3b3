//! Main Grid type

use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use ndarray::Array2;

/// A dense 2D grid of scalar values with an explicit missing state.
///
/// Every cell is either `Some(value)` or `None` (missing). Missing cells are
/// never encoded as a magic number, so zero, negative and extreme values are
/// always legitimate data.
///
/// # Example
///
/// ```ignore
/// use pointgrid_core::Grid;
///
/// // 4 columns, 3 rows, all cells missing
/// let mut grid = Grid::new(4, 3)?;
///
/// grid.set(1, 2, 42.0)?;
/// assert_eq!(grid.get(1, 2)?, Some(42.0));
/// assert!(!grid.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Cells stored in row-major order (row, col)
    data: Array2<Option<f64>>,
    /// Mapping from indices to spatial coordinates
    transform: GeoTransform,
}

impl Grid {
    /// Create a `width x height` grid with every cell missing
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            data: Array2::from_elem((height, width), None),
            transform: GeoTransform::default(),
        })
    }

    /// Create a grid from row-major cells
    pub fn from_vec(data: Vec<Option<f64>>, rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(cols, rows)?;
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        if let Some(v) = data.iter().flatten().find(|v| !v.is_finite()) {
            return Err(Error::invalid_input("cell", v, "grid values must be finite"));
        }

        let array = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            Error::InvalidDimensions {
                width: cols,
                height: rows,
            }
        })?;

        Ok(Self {
            data: array,
            transform: GeoTransform::default(),
        })
    }

    /// Create a complete grid from row-major values
    pub fn from_values(values: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        Self::from_vec(values.into_iter().map(Some).collect(), rows, cols)
    }


    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols(), self.rows())
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; grids have at least one cell
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get the cell at (row, col); `None` means missing
    pub fn get(&self, row: usize, col: usize) -> Result<Option<f64>> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set a known value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::invalid_input("value", value, "grid values must be finite"));
        }
        *self.cell_mut(row, col)? = Some(value);
        Ok(())
    }

    /// Mark the cell at (row, col) as missing
    pub fn clear(&mut self, row: usize, col: usize) -> Result<()> {
        *self.cell_mut(row, col)? = None;
        Ok(())
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Option<f64>> {
        let (rows, cols) = self.shape();
        self.data
            .get_mut((row, col))
            .ok_or(Error::IndexOutOfBounds { row, col, rows, cols })
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<Option<f64>> {
        &self.data
    }

    // Completeness

    /// True when no cell is missing
    pub fn is_complete(&self) -> bool {
        self.data.iter().all(Option::is_some)
    }

    /// Number of cells holding a value
    pub fn known_count(&self) -> usize {
        self.data.iter().filter(|c| c.is_some()).count()
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.len() - self.known_count()
    }

    /// Known cells as (row, col, value), in row-major order
    pub fn known_cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .indexed_iter()
            .filter_map(|((row, col), cell)| cell.map(|v| (row, col, v)))
    }

    /// Smallest and largest known value, `None` if every cell is missing
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    // Metadata

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Set the geotransform
    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Spatial bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Coordinates of the center of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    // Statistics

    /// Basic statistics over the known cells
    pub fn statistics(&self) -> GridStatistics {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in self.data.iter().flatten() {
            sum += v;
            count += 1;
        }
        let range = self.value_range();

        GridStatistics {
            min: range.map(|r| r.0),
            max: range.map(|r| r.1),
            mean: (count > 0).then(|| sum / count as f64),
            known_count: count,
            missing_count: self.len() - count,
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Basic statistics for a grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub known_count: usize,
    pub missing_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(200, 100).unwrap();
        assert_eq!(grid.rows(), 100);
        assert_eq!(grid.cols(), 200);
        assert_eq!(grid.dimensions(), (200, 100));
        assert_eq!(grid.missing_count(), 20_000);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(Error::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(Grid::from_vec(vec![], 0, 0).is_err());
    }

    #[test]
    fn test_grid_access() {
        let mut grid = Grid::new(10, 10).unwrap();
        grid.set(5, 5, 42.0).unwrap();
        assert_eq!(grid.get(5, 5).unwrap(), Some(42.0));
        assert_eq!(grid.get(0, 0).unwrap(), None);

        grid.clear(5, 5).unwrap();
        assert_eq!(grid.get(5, 5).unwrap(), None);
    }

    #[test]
    fn test_zero_and_negative_are_values() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set(0, 0, 0.0).unwrap();
        grid.set(0, 1, -9999.0).unwrap();
        assert!(grid.is_complete());
        assert_eq!(grid.get(0, 1).unwrap(), Some(-9999.0));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 2).unwrap();
        assert!(matches!(
            grid.get(2, 0),
            Err(Error::IndexOutOfBounds { row: 2, col: 0, rows: 2, cols: 3 })
        ));
        assert!(grid.set(0, 3, 1.0).is_err());
        assert!(grid.clear(9, 9).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut grid = Grid::new(1, 1).unwrap();
        assert!(matches!(grid.set(0, 0, f64::NAN), Err(Error::InvalidInput { .. })));
        assert!(Grid::from_vec(vec![Some(f64::INFINITY)], 1, 1).is_err());
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        assert!(Grid::from_values(vec![1.0, 2.0, 3.0], 2, 2).is_err());
    }

    #[test]
    fn test_known_cells_row_major() {
        let grid = Grid::from_vec(vec![Some(1.0), None, None, Some(4.0)], 2, 2).unwrap();
        let known: Vec<_> = grid.known_cells().collect();
        assert_eq!(known, vec![(0, 0, 1.0), (1, 1, 4.0)]);
        assert_eq!(grid.known_count(), 2);
    }

    #[test]
    fn test_grid_statistics() {
        let mut grid = Grid::new(10, 10).unwrap();
        for i in 0..10 {
            for j in 0..10 {
                if (i + j) % 2 == 0 {
                    grid.set(i, j, (i * 10 + j) as f64).unwrap();
                }
            }
        }

        let stats = grid.statistics();
        assert_eq!(stats.min, Some(0.0));
        assert_eq!(stats.max, Some(99.0));
        assert_eq!(stats.known_count, 50);
        assert_eq!(stats.missing_count, 50);
    }

    #[test]
    fn test_empty_statistics() {
        let grid = Grid::new(2, 2).unwrap();
        let stats = grid.statistics();
        assert_eq!(stats.min, None);
        assert_eq!(stats.mean, None);
        assert_eq!(grid.value_range(), None);
    }
}
