use std::io;
use thiserror::Error;

use grangers_core::errors::ValidationError;

/// Error type for grangers-io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line could not be parsed; `line` is 1-based.
    #[error("Failed to parse line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Parsed records do not form a valid interval set.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for grangers-io operations.
pub type Result<T> = std::result::Result<T, IoError>;
