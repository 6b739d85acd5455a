use std::collections::HashSet;
use std::path::Path;

use calamine::DataType;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::io::excel_read;
use crate::model::{CellValue, ColumnLabel, OutputBundle, Table};

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes every non-empty table of `bundle` to `path` and returns the sheet
/// names actually used.
///
/// When `path` already exists its sheets are kept and the new tables are
/// appended after them; names that clash with an existing sheet receive a
/// numeric suffix.
#[instrument(level = "info", skip_all, fields(output = %path.display()))]
pub fn write_bundle(path: &Path, bundle: &OutputBundle) -> Result<Vec<String>> {
    let mut workbook_writer = Workbook::new();
    let mut sheet_names = SheetNameRegistry::default();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    if path.exists() {
        let existing =
            excel_read::read_ranges(path).map_err(|err| ToolError::OutputUnreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        debug!(sheet_count = existing.len(), "appending to existing workbook");
        for (name, range) in &existing {
            sheet_names.claim(name);
            let worksheet = workbook_writer.add_worksheet();
            worksheet.set_name(name)?;
            copy_range(worksheet, range, &date_format)?;
        }
    }

    let mut written = Vec::new();
    for named in &bundle.tables {
        if named.table.is_empty() {
            continue;
        }
        let sheet_name = sheet_names.assign(&named.name);
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet_name)?;
        write_table(worksheet, &named.table, &date_format)?;
        written.push(sheet_name);
    }

    workbook_writer.save(path)?;
    info!(sheet_count = written.len(), "workbook written");
    Ok(written)
}

fn write_table(worksheet: &mut Worksheet, table: &Table, date_format: &Format) -> Result<()> {
    for (col_idx, label) in table.columns.iter().enumerate() {
        if let ColumnLabel::Text(header) = label {
            worksheet.write_string(0, col_idx as u16, header)?;
        }
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = col_idx as u16;
            match cell {
                CellValue::Text(value) => {
                    worksheet.write_string(excel_row, excel_col, value)?;
                }
                CellValue::Number(value) if value.is_finite() => {
                    worksheet.write_number(excel_row, excel_col, *value)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(excel_row, excel_col, *value)?;
                }
                CellValue::Date(value) => {
                    worksheet.write_datetime_with_format(excel_row, excel_col, value, date_format)?;
                }
                CellValue::Number(_) | CellValue::Empty => {}
            }
        }
    }

    if !table.columns.is_empty() {
        let col_end = (table.columns.len() as u16).saturating_sub(1);
        let row_end = table.rows.len() as u32;
        worksheet.autofilter(0, 0, row_end, col_end)?;
    }

    Ok(())
}

/// Re-emits an existing worksheet cell by cell at its original position,
/// keeping each cell's type.
fn copy_range(
    worksheet: &mut Worksheet,
    range: &calamine::Range<DataType>,
    date_format: &Format,
) -> Result<()> {
    let Some((start_row, start_col)) = range.start() else {
        return Ok(());
    };

    for (row_offset, col_offset, cell) in range.used_cells() {
        let row = start_row + row_offset as u32;
        let col = (start_col as usize + col_offset) as u16;
        match cell {
            DataType::String(value) => {
                worksheet.write_string(row, col, value)?;
            }
            DataType::Float(value) => {
                worksheet.write_number(row, col, *value)?;
            }
            DataType::Int(value) => {
                worksheet.write_number(row, col, *value as f64)?;
            }
            DataType::Bool(value) => {
                worksheet.write_boolean(row, col, *value)?;
            }
            DataType::DateTime(serial) => match cell.as_datetime() {
                Some(value) => {
                    worksheet.write_datetime_with_format(row, col, &value, date_format)?;
                }
                None => {
                    worksheet.write_number(row, col, *serial)?;
                }
            },
            DataType::Empty => {}
            other => {
                worksheet.write_string(row, col, &other.to_string())?;
            }
        }
    }

    Ok(())
}

/// Hands out unique, Excel-safe worksheet names. Excel compares sheet names
/// case-insensitively.
#[derive(Debug, Default)]
struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    fn claim(&mut self, name: &str) {
        self.used.insert(name.to_lowercase());
    }

    fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix = truncate_chars(&base, MAX_SHEET_NAME_LEN - suffix.len());
            let candidate = format!("{prefix}{suffix}");
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Replaces characters Excel rejects in worksheet names and truncates the
/// result to [`MAX_SHEET_NAME_LEN`] characters.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "Sheet".to_string();
    }

    truncate_chars(sanitized, MAX_SHEET_NAME_LEN).to_string()
}

fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
