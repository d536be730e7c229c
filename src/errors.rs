/*!
 * Error types for the codesift application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while building the keyword vocabulary and matcher
#[derive(Error, Debug)]
pub enum MatcherError {
    /// Error when a requested language has no built-in keyword set
    #[error("Unknown keyword language: {0}")]
    UnknownLanguage(String),

    /// Error when the merged vocabulary ends up empty
    #[error("Keyword vocabulary is empty: {0}")]
    EmptyVocabulary(String),

    /// Error when the combined keyword pattern fails to compile
    #[error("Failed to compile keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors that can occur during a scan
#[derive(Error, Debug)]
pub enum ScanError {
    /// Error when the scan options are inconsistent or out of range
    #[error("Invalid scan options: {0}")]
    InvalidOptions(String),

    /// Error reading from the line source; per-line encoding failures are
    /// surfaced by the source as I/O errors and land here too
    #[error("Line source error: {0}")]
    Source(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from vocabulary or matcher construction
    #[error("Matcher error: {0}")]
    Matcher(#[from] MatcherError),

    /// Error from the scanning core
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
