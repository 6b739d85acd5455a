//! Core library for the invoice-cleaner command line application.
//!
//! Source workbooks with inconsistent headers are reconciled against a
//! synonym template and split into well-formed and exception purchase-order
//! tables. Spreadsheet adapters live under [`io`], the cell and table types
//! in [`model`], the reconciliation engine in [`clean`], and the run
//! orchestration used by the binary in [`run`].

pub mod clean;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod run;

pub use error::{ErrorCategory, Result, ToolError};
