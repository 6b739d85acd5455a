use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::clean::classify::classify_rows;
use crate::clean::header::{needs_header_repair, repair_header};
use crate::clean::synonyms::SynonymTable;
use crate::error::{ErrorCategory, Result, ToolError};
use crate::model::{NamedTable, OutputBundle, SourceWorkbook, Table};

/// Why a sheet produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The sheet has no data rows.
    Empty,
    /// No header row could be recovered.
    NoHeaderRow,
}

/// Result of processing one sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Cleaned(Vec<NamedTable>),
    Skipped(SkipReason),
}

/// Repairs the header of one sheet and classifies its rows.
pub fn process_sheet(table: Table, synonyms: &SynonymTable, sheet: &str) -> Result<SheetOutcome> {
    table
        .check_shape()
        .map_err(|reason| ToolError::MalformedSheet {
            sheet: sheet.to_string(),
            reason,
        })?;

    let table = repair_header(table);
    if table.is_empty() {
        return Ok(SheetOutcome::Skipped(SkipReason::Empty));
    }
    if needs_header_repair(&table) {
        return Ok(SheetOutcome::Skipped(SkipReason::NoHeaderRow));
    }

    Ok(SheetOutcome::Cleaned(classify_rows(table, synonyms, sheet)))
}

/// Per-sheet status recorded in a [`WorkbookReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetStatus {
    Cleaned {
        tables: Vec<String>,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        category: ErrorCategory,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    #[serde(flatten)]
    pub status: SheetStatus,
}

/// Outcome of cleaning a whole workbook.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WorkbookReport {
    pub sheets: Vec<SheetReport>,
    #[serde(skip)]
    pub bundle: OutputBundle,
}

impl WorkbookReport {
    pub fn status(&self, sheet: &str) -> Option<&SheetStatus> {
        self.sheets
            .iter()
            .find(|report| report.sheet == sheet)
            .map(|report| &report.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SheetReport> + '_ {
        self.sheets
            .iter()
            .filter(|report| matches!(report.status, SheetStatus::Failed { .. }))
    }
}

/// Processes every sheet independently and merges the non-empty tables
/// into a single bundle. A failing sheet is recorded and does not stop the
/// remaining ones.
#[instrument(level = "info", skip_all, fields(sheet_count = workbook.sheets.len()))]
pub fn process_workbook(workbook: SourceWorkbook, synonyms: &SynonymTable) -> WorkbookReport {
    let mut report = WorkbookReport::default();

    for sheet in workbook.sheets {
        let status = match process_sheet(sheet.table, synonyms, &sheet.name) {
            Ok(SheetOutcome::Cleaned(tables)) => {
                let mut written = Vec::new();
                for named in tables {
                    if named.table.is_empty() {
                        debug!(sheet = %sheet.name, table = %named.name, "dropping empty table");
                        continue;
                    }
                    written.push(named.name.clone());
                    report.bundle.tables.push(named);
                }
                info!(sheet = %sheet.name, tables = written.len(), "sheet cleaned");
                SheetStatus::Cleaned { tables: written }
            }
            Ok(SheetOutcome::Skipped(reason)) => {
                warn!(sheet = %sheet.name, ?reason, "sheet skipped");
                SheetStatus::Skipped { reason }
            }
            Err(err) => {
                error!(sheet = %sheet.name, category = %err.category(), "{err}");
                SheetStatus::Failed {
                    category: err.category(),
                    error: err.to_string(),
                }
            }
        };
        report.sheets.push(SheetReport {
            sheet: sheet.name,
            status,
        });
    }

    report
}
