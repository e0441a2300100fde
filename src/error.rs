//! Error types for RelDB
//!
//! This module defines all error types used throughout the database engine.

use thiserror::Error;

/// The main error type for RelDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Catalog Errors ==========
    #[error("Catalog error: no database selected")]
    NoDatabaseSelected,

    #[error("Catalog error: database '{0}' not found")]
    DatabaseNotFound(String),

    #[error("Catalog error: database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("Catalog error: column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    // ========== Schema Errors ==========
    #[error("Schema error: columns '{0}' and '{1}' are both marked primary key")]
    MultiplePrimaryKeys(String, String),

    #[error("Schema error: expected {expected} value(s) but got {actual}")]
    SchemaLengthMismatch { expected: usize, actual: usize },

    // ========== Type Errors ==========
    #[error("Type error: cannot parse '{value}' as {data_type}")]
    TypeError { value: String, data_type: String },

    #[error("Type error: cannot compare {left} with {right}")]
    TypeMismatch { left: String, right: String },

    #[error("Type error: string '{0}' exceeds maximum length {1}")]
    StringTooLong(String, usize),

    #[error("Type error: null value not allowed for column '{0}'")]
    NullNotAllowed(String),

    // ========== Execution Errors ==========
    #[error("Execution error: duplicate primary key '{0}'")]
    DuplicateKey(String),

    #[error("Execution error: primary key '{0}' does not exist")]
    KeyNotExist(String),

    #[error("Execution error: table '{0}' is occupied")]
    TableOccupied(String),

    #[error("Execution error: unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("Execution error: cannot assign to primary key column '{0}'")]
    PrimaryAssignment(String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for RelDB operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TableNotFound("users".to_string());
        assert_eq!(err.to_string(), "Catalog error: table 'users' not found");

        let err = Error::SchemaLengthMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Schema error: expected 3 value(s) but got 2"
        );

        let err = Error::TableOccupied("grades".to_string());
        assert_eq!(err.to_string(), "Execution error: table 'grades' is occupied");
    }
}
