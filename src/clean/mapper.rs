use tracing::debug;

use crate::clean::synonyms::SynonymTable;
use crate::model::{CellValue, ColumnLabel, Table};

/// Source of the data for one canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The field reads the physical column at this index.
    Column(usize),
    /// A synonym matched but the column holds no values.
    Blank(usize),
    /// No synonym matched any physical column.
    Absent,
}

/// Binding chosen for a canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: String,
    pub binding: Binding,
}

/// Binds every canonical field to at most one physical column. Synonyms are
/// tried in declared order and the first one naming an existing column wins,
/// even if later synonyms are present too.
pub fn bind_columns(table: &Table, synonyms: &SynonymTable) -> Vec<FieldBinding> {
    synonyms
        .entries()
        .iter()
        .map(|entry| {
            let binding = entry
                .synonyms
                .iter()
                .find_map(|synonym| table.column_index(synonym))
                .map(|index| {
                    if table.column_cells(index).all(CellValue::is_empty) {
                        Binding::Blank(index)
                    } else {
                        Binding::Column(index)
                    }
                })
                .unwrap_or(Binding::Absent);
            FieldBinding {
                field: entry.field.clone(),
                binding,
            }
        })
        .collect()
}

/// Projects `table` onto the canonical fields. Fields without data are
/// filled with [`CellValue::Empty`].
pub fn map_columns(table: &Table, synonyms: &SynonymTable) -> Table {
    let bindings = bind_columns(table, synonyms);
    for binding in &bindings {
        if !matches!(binding.binding, Binding::Column(_)) {
            debug!(field = %binding.field, binding = ?binding.binding, "field has no data");
        }
    }

    let columns = bindings
        .iter()
        .map(|binding| ColumnLabel::Text(binding.field.clone()))
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            bindings
                .iter()
                .map(|binding| match binding.binding {
                    Binding::Column(index) => row.get(index).cloned().unwrap_or(CellValue::Empty),
                    Binding::Blank(_) | Binding::Absent => CellValue::Empty,
                })
                .collect()
        })
        .collect();

    Table::new(columns, rows)
}
