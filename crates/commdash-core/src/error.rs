// ── Core error types ──
//
// Lookups that the dashboard page used to swallow (missing table, bad column)
// surface here as typed errors. Malformed numeric cell text is NOT an error:
// it resolves to NaN and is ordered by the sort policy instead.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Table not found: {id}")]
    TableNotFound { id: String },

    #[error("Column {column} out of range for table {table} ({columns} columns)")]
    ColumnOutOfRange {
        table: String,
        column: usize,
        columns: usize,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Row {row} of table {table} has {found} cells, expected {expected}")]
    RowArity {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid colour '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    // ── Output errors ────────────────────────────────────────────────
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
