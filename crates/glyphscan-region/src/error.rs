//! Error types for glyphscan-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operation needs at least one point
    #[error("empty cluster: no points to process")]
    EmptyCluster,

    /// Serialized cluster is truncated or malformed
    #[error("corrupt cluster data: {0}")]
    CorruptData(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
