//! Engine error types

use thiserror::Error;
use shared::SharedError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Hard failures surfaced to callers. Per-address geocoding failures are soft
/// and live in [`crate::types::GeocodeFailure`] instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Contract not found: {contract_no}")]
    NotFound { contract_no: String },

    #[error("Field '{field}' cannot be updated with value '{value}'")]
    InvalidField { field: String, value: String },

    #[error("Storage operation failed: {operation} on {path}: {message}")]
    StorageError { operation: String, path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl EngineError {
    pub fn not_found(contract_no: impl Into<String>) -> Self {
        EngineError::NotFound { contract_no: contract_no.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        EngineError::ConfigError { message: message.into() }
    }

    pub fn storage(operation: &str, path: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        EngineError::StorageError {
            operation: operation.to_string(),
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// True for errors that concern a single record rather than the data layer
    pub fn is_record_level(&self) -> bool {
        matches!(self, EngineError::NotFound { .. } | EngineError::InvalidField { .. })
    }
}
