//! Error types for glyphscan-recog

use thiserror::Error;

/// Errors that can occur during recognition operations
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),

    /// Image decode/encode error
    #[error("image error: {0}")]
    Image(#[from] glyphscan_io::IoError),

    /// Filter library error
    #[error("filter error: {0}")]
    Filter(#[from] glyphscan_filter::FilterError),

    /// Region library error
    #[error("region error: {0}")]
    Region(#[from] glyphscan_region::RegionError),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Filesystem error outside image decoding
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
