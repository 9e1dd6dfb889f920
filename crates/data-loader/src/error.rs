//! Error types for the data-loader crate.
//!
//! Every failure the dataset load can hit maps onto one variant here, so the
//! cache and the orchestrator above it can propagate a single error type.

use thiserror::Error;

use crate::types::EntityId;

/// Errors that can occur while loading, parsing, or validating a dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    /// A relationship row points at an entity the catalog doesn't have
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: EntityId },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The loader task panicked or was cancelled before returning
    #[error("Dataset load task failed: {0}")]
    LoadTaskFailed(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
