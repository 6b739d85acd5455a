use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// cleaner loads, reconciles, or writes workbook data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not contain what the loader expects.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when an existing output workbook cannot be read back for
    /// appending.
    #[error("cannot append to {}: {reason}", path.display())]
    OutputUnreadable { path: PathBuf, reason: String },

    /// Raised when the template columns cannot be aligned with the
    /// canonical fields.
    #[error("template has {found} columns but {expected} canonical fields are configured")]
    TemplateMismatch { expected: usize, found: usize },

    /// Raised when the canonical field configuration is unusable.
    #[error("invalid canonical fields: {0}")]
    InvalidFields(String),

    /// Raised when a single sheet cannot be processed.
    #[error("malformed sheet '{sheet}': {reason}")]
    MalformedSheet { sheet: String, reason: String },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Coarse classification used when reporting failures to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Template or source workbook missing or unreadable.
    Load,
    /// A single sheet could not be processed; the run continues.
    Sheet,
    /// The destination workbook could not be written.
    Write,
    /// Configuration or template layout problems.
    Config,
}

impl ToolError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::Io(_)
            | ToolError::ExcelRead(_)
            | ToolError::InvalidWorkbook(_)
            | ToolError::MissingInput(_) => ErrorCategory::Load,
            ToolError::ExcelWrite(_) | ToolError::OutputUnreadable { .. } => ErrorCategory::Write,
            ToolError::MalformedSheet { .. } => ErrorCategory::Sheet,
            ToolError::Json(_)
            | ToolError::TemplateMismatch { .. }
            | ToolError::InvalidFields(_)
            | ToolError::Logging(_) => ErrorCategory::Config,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Load => write!(f, "load"),
            ErrorCategory::Sheet => write!(f, "sheet"),
            ErrorCategory::Write => write!(f, "write"),
            ErrorCategory::Config => write!(f, "config"),
        }
    }
}
