//! Shared error types for the field sales engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid contract status: {input}")]
    InvalidStatus { input: String },

    #[error("Invalid coordinate: {input}")]
    InvalidCoordinate { input: String },

    #[error("Unknown table column: {name}")]
    UnknownColumn { name: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
