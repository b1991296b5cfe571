// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling across the storage, repository and engine layers.
#[derive(Debug)]
pub enum AppError {
    // Underlying store read/write failure
    Storage(String),

    // Exam or candidate context absent at session load
    MissingContext(String),

    // Lookup miss (student, exam, report)
    NotFound(String),

    // Input failed validation
    BadRequest(String),

    // Duplicate key (e.g. admin email already registered)
    Conflict(String),

    // Anything else that should not happen in normal operation
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts `std::io::Error` into `AppError::Storage`.
/// Allows using `?` operator on file store operations.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
