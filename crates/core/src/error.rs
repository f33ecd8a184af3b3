//! Error types for PointGrid

use thiserror::Error;

/// Main error type for PointGrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unreadable point file.
    #[error("Cannot parse '{source_id}': {reason}")]
    Parse { source_id: String, reason: String },

    /// Bad configuration or an argument outside its domain.
    #[error("Invalid input: {name} = {value} ({reason})")]
    InvalidInput {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Not enough known values to run an operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl Error {
    /// Shorthand for a [`Error::Parse`] tied to an input identifier.
    pub fn parse(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::InvalidInput`].
    pub fn invalid_input(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidInput {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Tiff(e.to_string())
    }
}

/// Result type alias for PointGrid operations
pub type Result<T> = std::result::Result<T, Error>;
