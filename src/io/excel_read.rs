use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::model::{CellValue, ColumnLabel, SourceSheet, SourceWorkbook, Table};

/// Reads the synonym template: the first worksheet, labelled by its first
/// row.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_template(path: &Path) -> Result<Table> {
    let mut workbook = open(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::InvalidWorkbook("template has no worksheets".into()))?;
    let range = read_required_sheet(&mut workbook, &first)?;
    Ok(table_from_range(&range, 0))
}

/// Reads every worksheet of `path` in workbook order. The first
/// `header_row` rows of each sheet are discarded and the next row supplies
/// the column labels.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_workbook(path: &Path, header_row: usize) -> Result<SourceWorkbook> {
    let mut workbook = open(path)?;
    let names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = read_required_sheet(&mut workbook, &name)?;
        let table = table_from_range(&range, header_row);
        debug!(sheet = %name, rows = table.row_count(), columns = table.columns.len(), "sheet loaded");
        sheets.push(SourceSheet { name, table });
    }

    Ok(SourceWorkbook { sheets })
}

fn open(path: &Path) -> Result<Xlsx<std::io::BufReader<std::fs::File>>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    Ok(open_workbook(path)?)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// Reads every worksheet of `path` as the raw calamine range, without any
/// header interpretation.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_ranges(path: &Path) -> Result<Vec<(String, calamine::Range<DataType>)>> {
    let mut workbook = open(path)?;
    let names = workbook.sheet_names().to_vec();

    let mut ranges = Vec::with_capacity(names.len());
    for name in names {
        let range = read_required_sheet(&mut workbook, &name)?;
        ranges.push((name, range));
    }
    Ok(ranges)
}

/// Converts a worksheet range into a [`Table`] laid out as in the sheet:
/// rows and columns above and left of the used range are kept as blanks,
/// and `header_row` counts from the first row of the sheet. Header cells
/// without a value become [`ColumnLabel::Unnamed`] placeholders.
pub fn table_from_range(range: &calamine::Range<DataType>, header_row: usize) -> Table {
    let Some((start_row, start_col)) = range.start() else {
        return Table::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let width = start_col + range.width();

    let blank_rows = std::iter::repeat_with(|| vec![CellValue::Empty; width])
        .take(start_row.saturating_sub(header_row));
    let used_rows = range
        .rows()
        .skip(header_row.saturating_sub(start_row))
        .map(|row| {
            let mut cells = vec![CellValue::Empty; start_col];
            cells.extend(row.iter().map(cell_to_value));
            cells
        });
    let mut rows = blank_rows.chain(used_rows);

    let Some(header) = rows.next() else {
        return Table::default();
    };

    let columns = header
        .into_iter()
        .enumerate()
        .map(|(index, cell)| match cell {
            CellValue::Empty => ColumnLabel::Unnamed(index),
            CellValue::Text(text) if text.trim().is_empty() => ColumnLabel::Unnamed(index),
            other => ColumnLabel::Text(other.to_text()),
        })
        .collect();

    Table::new(columns, rows.collect())
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(serial) => cell
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(*serial)),
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
