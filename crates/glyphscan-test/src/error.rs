//! Error types for the regression harness

use thiserror::Error;

/// Failures of the harness itself, as opposed to failed checks
#[derive(Debug, Error)]
pub enum TestError {
    /// A display-mode image could not be written
    #[error("cannot write {path}: {message}")]
    ImageWrite { path: String, message: String },

    /// A synthetic fixture had invalid dimensions
    #[error("fixture {name}: {message}")]
    Fixture { name: &'static str, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type TestResult<T> = Result<T, TestError>;
