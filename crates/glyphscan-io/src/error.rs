//! Error types for glyphscan-io

use thiserror::Error;

/// Errors raised at the image decode/encode boundary.
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header not recognized, or a variant the reader does not handle
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Header recognized but its fields are inconsistent
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// The codec rejected the stream
    #[error("cannot decode {codec}: {message}")]
    Decode { codec: &'static str, message: String },

    /// The codec rejected the buffer
    #[error("cannot encode {codec}: {message}")]
    Encode { codec: &'static str, message: String },

    /// Decoded samples did not form a valid buffer
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),
}

impl IoError {
    pub(crate) fn decode(codec: &'static str, message: impl std::fmt::Display) -> Self {
        IoError::Decode {
            codec,
            message: message.to_string(),
        }
    }

    pub(crate) fn encode(codec: &'static str, message: impl std::fmt::Display) -> Self {
        IoError::Encode {
            codec,
            message: message.to_string(),
        }
    }
}

/// Result type for image I/O
pub type IoResult<T> = Result<T, IoError>;
