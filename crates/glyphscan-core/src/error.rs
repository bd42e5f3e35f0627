//! Error types for glyphscan-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use crate::pixel::PixelFormat;
use thiserror::Error;

/// glyphscan core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Buffer length does not match the declared dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Incompatible image sizes
    #[error("incompatible image sizes: {0}x{1} vs {2}x{3}")]
    IncompatibleSizes(u32, u32, u32, u32),

    /// Pixel format not supported by this operation
    #[error("unsupported pixel format: expected {expected}, got {actual:?}")]
    UnsupportedFormat {
        expected: &'static str,
        actual: PixelFormat,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Division by a zero constant
    #[error("division by zero constant")]
    DivisionByZero,

    /// Serialized data is truncated or malformed
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for glyphscan core operations
pub type Result<T> = std::result::Result<T, Error>;
