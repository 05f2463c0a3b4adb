//! Error handling module for combo-batch

use thiserror::Error;

/// Main error type for library-level operations
#[derive(Error, Debug)]
pub enum ComboError {
    /// Configuration file could not be parsed or holds invalid values
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Output file write error
    #[error("Failed to write output file: {message}")]
    OutputError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for combo-batch operations
pub type ComboResult<T> = std::result::Result<T, ComboError>;
