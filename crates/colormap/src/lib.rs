//! # PointGrid Colormap
//!
//! Color mapping and grid-to-image rendering for PointGrid.
//!
//! Provides the Viridis and Grayscale color schemes. [`grid_to_rgba`] converts a `Grid` into an RGBA
//! pixel buffer and [`save_png`] writes it to disk.
//!
//! ## Usage
//!
//! ```ignore
//! use pointgrid_colormap::{auto_params, save_png, ColorScheme};
//!
//! let params = auto_params(&grid, ColorScheme::Viridis);
//! save_png(&grid, &params, "out/idw/field_idw.png")?;
//! ```

mod png;
mod render;
mod scheme;

pub use png::{render_image, save_png};
pub use render::{auto_params, grid_to_rgba, ColormapParams, Origin};
pub use scheme::{evaluate, ColorScheme, Rgb};
