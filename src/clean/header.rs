use tracing::debug;

use crate::model::{CellValue, ColumnLabel, Table};

/// How many leading data rows are searched for a header row.
pub const HEADER_SCAN_LIMIT: usize = 10;

/// Returns `true` when the reader had to invent the column labels, which
/// happens when the sheet starts with title or blank rows.
pub fn needs_header_repair(table: &Table) -> bool {
    table
        .columns
        .first()
        .is_some_and(ColumnLabel::is_placeholder)
}

/// Promotes the first all-text row among the first [`HEADER_SCAN_LIMIT`]
/// rows to column labels, dropping it and every row above it.
///
/// Tables that are empty or already carry header text are returned as-is,
/// as are tables where no all-text row is found.
pub fn repair_header(table: Table) -> Table {
    if table.is_empty() || !needs_header_repair(&table) {
        return table;
    }

    let Some(header_index) = table
        .rows
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|row| !row.is_empty() && row.iter().all(CellValue::is_text))
    else {
        debug!("no all-text row found within the scan window");
        return table;
    };

    let Table { rows: mut above, .. } = table;
    let mut rows = above.split_off(header_index);
    let columns = rows
        .remove(0)
        .into_iter()
        .map(|cell| ColumnLabel::Text(cell.to_text()))
        .collect();

    debug!(header_index, "promoted row to header");
    Table::new(columns, rows)
}
