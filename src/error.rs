//! Error types for adapter operations

use thiserror::Error;

/// Errors that can occur while compiling or executing adapter statements
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Empty input is invalid: {0}")]
    EmptyInput(String),

    #[error("Update data does not contain any values to update")]
    EmptyAssignment,

    #[error("Invalid field: {0}")]
    InvalidFieldType(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("{operation} failed, no rows affected. SQL: {sql}")]
    NoRowsAffected { operation: &'static str, sql: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn invalid_field(msg: impl Into<String>) -> Self {
        Self::InvalidFieldType(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
