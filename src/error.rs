//! Error types for the HR engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that services and calculations can report.

use thiserror::Error;

/// The main error type for the HR engine.
///
/// All service operations return this error type so the HTTP layer can map
/// each failure to a status code in one place.
///
/// # Example
///
/// ```
/// use hr_engine::error::HrError;
///
/// let error = HrError::NotFound {
///     entity: "employee",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "employee with id 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum HrError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// The kind of record (e.g. "employee", "leave type").
        entity: &'static str,
        /// The id that was looked up.
        id: i64,
    },

    /// An input field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A unique field already holds the given value.
    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        /// The kind of record.
        entity: &'static str,
        /// The unique field.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// The request is well-formed but violates a business rule.
    #[error("{message}")]
    BusinessRule {
        /// A description of the violated rule.
        message: String,
    },

    /// A status change that the entity's state machine does not allow.
    #[error("Cannot move {entity} from '{from}' to '{to}'")]
    InvalidTransition {
        /// The kind of record.
        entity: &'static str,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The acting user may not perform this operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// A description of the refusal.
        message: String,
    },

    /// A payroll run for the same period is already being processed.
    #[error("Payroll processing for {month:02}/{year} is already in progress")]
    PayrollRunInFlight {
        /// The payroll month.
        month: u32,
        /// The payroll year.
        year: i32,
    },

    /// Filesystem storage failed.
    #[error("Storage error at '{path}': {message}")]
    Storage {
        /// The path being read or written.
        path: String,
        /// The underlying I/O error.
        message: String,
    },
}

impl HrError {
    /// Shorthand for a [`HrError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HrError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrError::BusinessRule`] error.
    pub fn rule(message: impl Into<String>) -> Self {
        HrError::BusinessRule {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return HrError.
pub type HrResult<T> = Result<T, HrError>;
