//! Error types for the cost dashboard engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading, normalizing,
//! editing and persisting cost records.

use thiserror::Error;

/// The main error type for the cost dashboard engine.
///
/// Data-quality problems (a malformed amount in a cell, an unknown contract
/// type) never surface through this type on their own: the normalizer coerces
/// them and records a warning instead. Errors are reserved for conditions the
/// caller has to act on.
///
/// # Example
///
/// ```
/// use cost_dashboard::error::DashboardError;
///
/// let error = DashboardError::MissingRequiredColumn {
///     record_kind: "employee".to_string(),
///     column: "monthly_total".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Missing required employee column: monthly_total"
/// );
/// ```
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A monetary cell or input could not be read as a decimal amount.
    #[error("Malformed amount: '{raw}'")]
    MalformedAmount {
        /// The raw text that failed to parse.
        raw: String,
    },

    /// A column every record of a kind needs is absent from the source table.
    #[error("Missing required {record_kind} column: {column}")]
    MissingRequiredColumn {
        /// The record kind being loaded ("employee" or "license").
        record_kind: String,
        /// The logical column that was not found.
        column: String,
    },

    /// A data file was not found at the specified path.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A data file could not be decoded with any supported encoding.
    #[error("Failed to decode '{path}': {message}")]
    DecodeError {
        /// The path of the file that failed to decode.
        path: String,
        /// A description of the decode failure.
        message: String,
    },

    /// A delimited file was structurally invalid.
    #[error("Malformed delimited data in '{path}': {message}")]
    Csv {
        /// The file (or stream label) being read or written.
        path: String,
        /// A description of the CSV error.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// The path involved in the failed operation.
        path: String,
        /// A description of the I/O error.
        message: String,
    },

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

    /// An edit or removal addressed a record that does not exist.
    #[error("No {record_kind} record at index {index} (set has {len} records)")]
    RecordNotFound {
        /// The record kind being edited.
        record_kind: String,
        /// The requested index.
        index: usize,
        /// The number of records in the set.
        len: usize,
    },

    /// A sum or product of amounts exceeded the decimal range.
    #[error("Amount overflow while computing {operation}")]
    AmountOverflow {
        /// What was being computed (e.g. "MonthlyTotal sum").
        operation: String,
    },

    /// Rewriting a data file would silently drop content the load could
    /// not represent.
    #[error("Refusing to rewrite the {record_kind} file: {reason}")]
    LossyCommit {
        /// "employee" or "license".
        record_kind: String,
        /// What would be lost.
        reason: String,
    },

    /// Operator input would break a record invariant.
    #[error("Invalid {record_kind} field '{field}': {message}")]
    InvalidRecord {
        /// The record kind being created or edited.
        record_kind: String,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return DashboardError.
pub type DashboardResult<T> = Result<T, DashboardError>;
