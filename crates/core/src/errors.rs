//! Core error types for the Farmledger application.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::reports::ReportError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reporting application.
///
/// Storage-specific errors are wrapped in string form to keep this type
/// storage-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
