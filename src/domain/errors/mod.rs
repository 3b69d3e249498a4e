// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Invalid arguments provided
    #[error("Invalid argument: {0}")]
    BadArgs(String),
    /// Source media could not be opened or analyzed
    #[error("Probe failed: {0}")]
    ProbeFail(String),
    /// Decode, transform, encode or mux failure
    #[error("Processing error: {0}")]
    ProcessingError(String),
    /// Filesystem operation failed
    #[error("Filesystem error: {0}")]
    FsFail(String),
    /// Configuration file missing or invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Whether the error was raised before any media resource was opened
    pub fn is_validation_error(&self) -> bool {
        matches!(self, DomainError::FileNotFound(_) | DomainError::BadArgs(_))
    }
}
