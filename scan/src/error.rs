//! Error types for scan dataset operations.
//!
//! This module defines `ScanError`, the error type for building datasets,
//! validating axis choices and looking up data points. It uses `thiserror`
//! for convenient error construction.

use thiserror::Error;

/// Custom error type for scan dataset operations.
///
/// Every fallible operation in this crate returns `Result<T, ScanError>`.
/// Failures are reported before any output is produced, so a caller never
/// observes a partially extracted array.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScanError {
    /// An axis refers to a parameter column that does not exist
    #[error("Axis index {index} is out of range for {parameters} scan parameter(s)")]
    AxisOutOfRange { index: usize, parameters: usize },

    /// The same parameter was selected for more than one axis
    #[error("Parameter index {index} is selected for more than one axis")]
    DuplicateAxis { index: usize },

    /// More axes were requested than a plot can display
    #[error("At most {max} axes can be selected, got {count}")]
    TooManyAxes { count: usize, max: usize },

    /// Rank or size disagreement between an index, an array or a table
    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// A raw row could not be turned into a record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// No parameter with the given name exists in the dataset
    #[error("Unknown scan parameter '{name}'")]
    UnknownParameter { name: String },

    /// A configuration that cannot be satisfied by the current dataset
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ScanError {
    /// Create a ShapeMismatch error with a message
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    /// Create an InvalidRecord error for a row
    pub fn invalid_record(row: usize, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            row,
            message: message.into(),
        }
    }

    /// Create an UnknownParameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }

    /// Create a Configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            Self::ShapeMismatch { message } => Self::ShapeMismatch {
                message: format!("{}: {}", context.into(), message),
            },
            Self::InvalidRecord { row, message } => Self::InvalidRecord {
                row,
                message: format!("{}: {}", context.into(), message),
            },
            Self::Configuration { message } => Self::Configuration {
                message: format!("{}: {}", context.into(), message),
            },
            other => other,
        }
    }
}

// Type alias for Result using ScanError
pub type Result<T> = std::result::Result<T, ScanError>;
