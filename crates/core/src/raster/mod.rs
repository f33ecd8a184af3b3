//! Grid data structures

mod geotransform;
mod grid;

pub use geotransform::GeoTransform;
pub use grid::{Grid, GridStatistics};
