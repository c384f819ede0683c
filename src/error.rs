//! Error types for the attendance ledger engine.
//!
//! Two families live here. [`LedgerError`] is fatal for the invocation that
//! produced it and is returned to the caller. [`RowError`] describes a single
//! unusable row; it never escalates and is reported as a diagnostic while the
//! rest of the batch is processed.

use thiserror::Error;

use crate::models::BatchType;

/// The main error type for the attendance ledger engine.
///
/// # Example
///
/// ```
/// use attendance_ledger::error::LedgerError;
///
/// let error = LedgerError::UnknownBatch {
///     batch_id: "missing".to_string(),
/// };
/// assert_eq!(error.to_string(), "Batch not found: missing");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No batch yielded anything usable for the requested operation.
    #[error("No usable input: {message}")]
    EmptyInput {
        /// What was missing.
        message: String,
    },

    /// A referenced batch id is not known to the store.
    #[error("Batch not found: {batch_id}")]
    UnknownBatch {
        /// The id that failed to resolve.
        batch_id: String,
    },

    /// A batch id resolved, but its backing data no longer exists.
    #[error("Batch data no longer available: {batch_id}")]
    BatchDataMissing {
        /// The id whose data vanished.
        batch_id: String,
    },

    /// A batch was required to be of one type but was declared as another.
    #[error("Batch '{batch_id}' was uploaded as {actual}, expected {expected}")]
    TypeMismatch {
        /// The offending batch id.
        batch_id: String,
        /// The type the operation requires.
        expected: BatchType,
        /// The type the batch was uploaded as.
        actual: BatchType,
    },

    /// None of the columns an export projects onto were present.
    #[error("None of the expected columns [{expected}] found; available: [{available}]")]
    MissingColumns {
        /// Comma separated list of the expected columns.
        expected: String,
        /// Comma separated list of the columns actually present.
        available: String,
    },

    /// A requested page lies outside the batch.
    #[error("Page {page} is out of range, total pages: {total_pages}")]
    InvalidPage {
        /// The requested page (1-based).
        page: usize,
        /// The number of pages available.
        total_pages: usize,
    },

    /// A requested page size is outside the allowed range.
    #[error("Page size {size} must be between 1 and {max}")]
    InvalidPageSize {
        /// The requested size.
        size: usize,
        /// The largest allowed size.
        max: usize,
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

    /// The tabular exporter failed to serialize a table.
    #[error("Export failed: {message}")]
    Export {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Why a single row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row has no usable person name.
    #[error("missing person name")]
    MissingPerson,

    /// The duration cell could not be parsed.
    #[error("unparsable duration '{raw}'")]
    InvalidDuration {
        /// The raw cell text.
        raw: String,
    },

    /// A date/time cell could not be parsed.
    #[error("unparsable {column} '{raw}'")]
    InvalidTimestamp {
        /// The column the value came from.
        column: String,
        /// The raw cell text.
        raw: String,
    },

    /// Adding the row's hours would overflow a running total.
    #[error("{hours} hours overflow the running total")]
    HoursOverflow {
        /// The hours the row tried to add.
        hours: rust_decimal::Decimal,
    },
}
