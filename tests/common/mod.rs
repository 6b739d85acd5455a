#![allow(dead_code)]

use invoice_cleaner::clean::SynonymTable;
use invoice_cleaner::model::{CellValue, ColumnLabel, Table};

pub fn text(value: &str) -> CellValue {
    CellValue::text(value)
}

pub fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

pub fn labels(names: &[&str]) -> Vec<ColumnLabel> {
    names.iter().map(|name| ColumnLabel::text(*name)).collect()
}

pub fn labelled(names: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
    Table::new(labels(names), rows)
}

/// Synonyms matching the headers used throughout the tests.
pub fn invoice_synonyms() -> SynonymTable {
    SynonymTable::from_entries([
        ("Purchase Order", vec!["PO No", "PO Number", "Purchase Order"]),
        ("Invoice", vec!["Inv No", "Invoice Number"]),
        ("Invoice Date", vec!["Inv Date", "Invoice Date"]),
        ("Invoice Value", vec!["Amount", "Invoice Value"]),
        ("Payee Number", vec!["Payee", "Vendor No"]),
    ])
}

pub fn column(table: &Table, name: &str) -> Vec<CellValue> {
    let index = table.column_index(name).expect("column present");
    table.column_cells(index).cloned().collect()
}
