//! Error types for glyphscan-filter

use thiserror::Error;

/// Errors that can occur while building or applying a filter
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),

    /// Kernel sides must be odd and non-zero
    #[error("kernel size must be odd, got {width}x{height}")]
    EvenKernel { width: u32, height: u32 },

    /// Rank index does not address a window element
    #[error("order {order} out of range for a window of {window} samples")]
    OrderOutOfRange { order: usize, window: usize },

    /// Plane length does not match the stated dimensions
    #[error("plane length {actual} does not match {width}x{height}")]
    PlaneSize { width: u32, height: u32, actual: usize },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
