//! # PointGrid Algorithms
//!
//! Interpolation of rasterized point grids.
//!
//! ## Modules
//!
//! - **interpolation**: Thiessen and Bilinear upscaling, IDW gap filling
//! - **pipeline**: completeness-based method dispatch and batch processing

pub mod interpolation;
pub mod pipeline;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{
        bilinear_upscale, idw_fill, thiessen_upscale, BilinearUpscale, IdwFill, IdwParams,
        ThiessenUpscale, UpscaleParams,
    };
    pub use crate::pipeline::{
        BatchInput, BatchSummary, Completeness, InputFailure, InterpolationConfig,
        InterpolationPipeline, InterpolationResult, Method, Stage,
    };
    pub use pointgrid_core::prelude::*;
}
