use tracing::{debug, info};

use crate::clean::mapper::map_columns;
use crate::clean::synonyms::SynonymTable;
use crate::model::{CellValue, NamedTable, Table};

/// Characters of the source sheet name kept for the raw split tables.
pub const SPLIT_PREFIX_LEN: usize = 15;
/// Characters of the source sheet name kept for the other tables.
pub const FULL_PREFIX_LEN: usize = 10;

/// Names of the tables generated for one source sheet.
pub mod names {
    use super::{FULL_PREFIX_LEN, SPLIT_PREFIX_LEN, prefix};

    pub fn filtered(sheet: &str) -> String {
        format!("{}_filtered", prefix(sheet, SPLIT_PREFIX_LEN))
    }

    pub fn exception(sheet: &str) -> String {
        format!("{}_exception", prefix(sheet, SPLIT_PREFIX_LEN))
    }

    pub fn filtered_full(sheet: &str) -> String {
        format!("{}_Filtered_full", prefix(sheet, FULL_PREFIX_LEN))
    }

    pub fn sorted_by_date(sheet: &str) -> String {
        format!("{}_SortedByDate", prefix(sheet, FULL_PREFIX_LEN))
    }

    pub fn sorted_by_date_full(sheet: &str) -> String {
        format!("{}_SortedByDatefull", prefix(sheet, FULL_PREFIX_LEN))
    }
}

fn prefix(sheet: &str, len: usize) -> &str {
    match sheet.char_indices().nth(len) {
        Some((end, _)) => &sheet[..end],
        None => sheet,
    }
}

/// Index of the first column named by one of `synonyms`, tried in order.
pub fn find_column(table: &Table, synonyms: &[String]) -> Option<usize> {
    synonyms
        .iter()
        .find_map(|synonym| table.column_index(synonym))
}

/// Stable ascending sort of the rows by the first column matching an
/// invoice-date synonym. Rows keep their order when no such column exists.
pub fn sort_by_date(mut table: Table, synonyms: &SynonymTable) -> Table {
    if let Some(index) = find_column(&table, synonyms.invoice_date_synonyms()) {
        debug!(column = %table.columns[index], "sorting rows by date");
        table.rows.sort_by(|lhs, rhs| {
            let lhs = lhs.get(index).unwrap_or(&CellValue::Empty);
            let rhs = rhs.get(index).unwrap_or(&CellValue::Empty);
            lhs.sort_cmp(rhs)
        });
    }
    table
}

/// Coerces a purchase-order cell to text and cuts it at the first `.`,
/// undoing the fractional suffix numeric identifiers pick up on import.
/// Empty cells stay empty.
pub fn normalize_purchase_order(cell: &CellValue) -> CellValue {
    if cell.is_empty() {
        return CellValue::Empty;
    }
    let text = cell.to_text();
    let trimmed = match text.find('.') {
        Some(end) => &text[..end],
        None => text.as_str(),
    };
    CellValue::Text(trimmed.to_string())
}

/// A purchase order is well formed when it is made of ASCII digits only and
/// starts with `2`.
pub fn is_well_formed_purchase_order(value: &str) -> bool {
    value.starts_with('2') && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Splits `table` into well-formed and exception rows on the given
/// purchase-order column, normalizing that column in both halves.
pub fn partition_purchase_orders(table: Table, column: usize) -> (Table, Table) {
    let Table { columns, rows } = table;
    let (filtered, exception): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .map(|mut row| {
            if let Some(cell) = row.get_mut(column) {
                *cell = normalize_purchase_order(cell);
            }
            row
        })
        .partition(|row| match row.get(column) {
            Some(CellValue::Text(value)) => is_well_formed_purchase_order(value),
            _ => false,
        });

    (
        Table::new(columns.clone(), filtered),
        Table::new(columns, exception),
    )
}

/// Sorts the sheet by date and splits it by purchase-order validity.
///
/// With a purchase-order column the result is the raw `_filtered` and
/// `_exception` tables plus the canonical `_Filtered_full` projection of
/// the filtered rows. Without one it is the sorted table and its canonical
/// projection.
pub fn classify_rows(table: Table, synonyms: &SynonymTable, sheet: &str) -> Vec<NamedTable> {
    let sorted = sort_by_date(table, synonyms);

    match find_column(&sorted, synonyms.purchase_order_synonyms()) {
        Some(column) => {
            let (filtered, exception) = partition_purchase_orders(sorted, column);
            info!(
                sheet,
                filtered = filtered.row_count(),
                exception = exception.row_count(),
                "classified purchase orders"
            );
            let full = map_columns(&filtered, synonyms);
            vec![
                NamedTable::new(names::filtered(sheet), filtered),
                NamedTable::new(names::exception(sheet), exception),
                NamedTable::new(names::filtered_full(sheet), full),
            ]
        }
        None => {
            info!(sheet, rows = sorted.row_count(), "no purchase order column");
            let full = map_columns(&sorted, synonyms);
            vec![
                NamedTable::new(names::sorted_by_date(sheet), sorted),
                NamedTable::new(names::sorted_by_date_full(sheet), full),
            ]
        }
    }
}
