//! # PointGrid Core
//!
//! Core types, traits and I/O for the PointGrid interpolation toolkit.
//!
//! This crate provides:
//! - `Grid`: dense 2D grid whose cells are either a value or missing
//! - `GeoTransform`: mapping between grid indices and coordinates
//! - `PointSet`: scattered `(x, y, z)` samples and their rasterization
//! - Algorithm trait for consistent API
//! - I/O for point files (CSV, GeoJSON) and GeoTIFF output

pub mod error;
pub mod io;
pub mod points;
pub mod raster;
pub mod rasterize;

pub use error::{Error, Result};
pub use points::{PointSet, SamplePoint};
pub use raster::{GeoTransform, Grid, GridStatistics};
pub use rasterize::{rasterize, RasterizeParams};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::points::{PointSet, SamplePoint};
    pub use crate::raster::{GeoTransform, Grid};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in PointGrid.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
