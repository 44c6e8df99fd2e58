//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use commdash_config::ConfigError;
use commdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(commdash::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid table file {path}: {reason}")]
    #[diagnostic(
        code(commdash::invalid_table),
        help(
            "Table files are JSON: {{\"id\": \"...\", \"headers\": [...], \"rows\": [[...]]}}\n\
             Every row needs one cell per header."
        )
    )]
    InvalidTable { path: String, reason: String },

    #[error("Column {column} is out of range for table '{table}'")]
    #[diagnostic(
        code(commdash::column_out_of_range),
        help("Columns are numbered from 0; this table has {columns}.")
    )]
    ColumnOutOfRange {
        table: String,
        column: usize,
        columns: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(commdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(commdash::config_exists),
        help("Use --force to overwrite it, or edit it directly.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(commdash::config),
        help("Check the config file (commdash config path) and COMMDASH_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error("Failed to write {path}")]
    #[diagnostic(code(commdash::io))]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(commdash::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ColumnOutOfRange { .. } => exit_code::USAGE,
            Self::InvalidTable { .. }
            | Self::ConfigExists { .. }
            | Self::Config(_)
            | Self::Write { .. }
            | Self::Io(_)
            | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TableNotFound { id } => CliError::NotFound {
                resource_type: "table".into(),
                identifier: id,
                hint: "Check the \"id\" field of the table file.".into(),
            },

            CoreError::ColumnOutOfRange {
                table,
                column,
                columns,
            } => CliError::ColumnOutOfRange {
                table,
                column,
                columns,
            },

            err @ CoreError::RowArity { .. } => CliError::InvalidTable {
                path: String::new(),
                reason: err.to_string(),
            },

            CoreError::InvalidColor { value, reason } => CliError::Validation {
                field: format!("colour '{value}'"),
                reason,
            },

            CoreError::Io { path, source } => CliError::Write { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let missing: CliError = CoreError::TableNotFound { id: "gross".into() }.into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let column: CliError = CoreError::ColumnOutOfRange {
            table: "gross".into(),
            column: 9,
            columns: 3,
        }
        .into();
        assert_eq!(column.exit_code(), exit_code::USAGE);

        let arity: CliError = CoreError::RowArity {
            table: "gross".into(),
            row: 1,
            expected: 3,
            found: 2,
        }
        .into();
        assert_eq!(arity.exit_code(), exit_code::GENERAL);
        assert_ne!(exit_code::SUCCESS, arity.exit_code());
    }
}
