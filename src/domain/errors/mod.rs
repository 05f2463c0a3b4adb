// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Generate requested while an empty slot, a missing engine or an active run forbids it
    PreconditionRejected(String),
    /// A clip payload could not be staged into engine storage
    StagingWriteFailed(String),
    /// The engine reported a processing error
    ProcessingError(String),
    /// Both concatenation tiers failed for one combination
    ReencodeFailed(String),
    /// Engine storage read/delete failure
    StorageError(String),
    /// Archive assembly failed
    PackagingFailed(String),
    /// Resource not available
    ResourceUnavailable(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::PreconditionRejected(msg) => write!(f, "Generate rejected: {}", msg),
            DomainError::StagingWriteFailed(msg) => write!(f, "Staging write failed: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DomainError::ReencodeFailed(msg) => write!(f, "Re-encode failed: {}", msg),
            DomainError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            DomainError::PackagingFailed(msg) => write!(f, "Packaging failed: {}", msg),
            DomainError::ResourceUnavailable(msg) => write!(f, "Resource unavailable: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
