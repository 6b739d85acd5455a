use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;

/// Format used when a date cell has to be rendered as text.
pub const DATE_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Value held by a single spreadsheet cell.
///
/// [`CellValue::Empty`] doubles as the missing-value sentinel: canonical
/// fields with no bound source data are filled with it, and it is written
/// out as a blank cell rather than as zero or an empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain string content.
    Text(String),
    /// Any numeric content, integers included.
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Date or date-time content.
    Date(NaiveDateTime),
    /// No value.
    Empty,
}

impl CellValue {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Renders the value as text. Whole numbers lose their fractional part
    /// and [`CellValue::Empty`] renders as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Date(value) => value.format(DATE_TEXT_FORMAT).to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Total order used for sorting rows: values of the same kind compare
    /// naturally, kinds rank `Bool < Number < Date < Text`, and empty cells
    /// always sort last.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Greater,
            (_, CellValue::Empty) => Ordering::Less,
            (CellValue::Bool(lhs), CellValue::Bool(rhs)) => lhs.cmp(rhs),
            (CellValue::Number(lhs), CellValue::Number(rhs)) => lhs.total_cmp(rhs),
            (CellValue::Date(lhs), CellValue::Date(rhs)) => lhs.cmp(rhs),
            (CellValue::Text(lhs), CellValue::Text(rhs)) => lhs.cmp(rhs),
            (lhs, rhs) => lhs.kind_rank().cmp(&rhs.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Empty => 4,
        }
    }
}

/// Label of a physical column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnLabel {
    /// Header text found in the sheet.
    Text(String),
    /// Positional placeholder assigned because the header cell at this
    /// index carried no text.
    Unnamed(usize),
}

impl ColumnLabel {
    pub fn text(value: impl Into<String>) -> Self {
        ColumnLabel::Text(value.into())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ColumnLabel::Unnamed(_))
    }

    /// Returns `true` when the label is header text equal to `name`.
    pub fn matches(&self, name: &str) -> bool {
        matches!(self, ColumnLabel::Text(label) if label == name)
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLabel::Text(label) => write!(f, "{label}"),
            ColumnLabel::Unnamed(index) => write!(f, "Unnamed: {index}"),
        }
    }
}

/// Row-major sheet contents with a label per column.
///
/// Every row is expected to hold exactly one cell per column; see
/// [`Table::check_shape`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<ColumnLabel>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<ColumnLabel>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table whose column labels are all positional placeholders,
    /// the shape a reader produces when the header row is blank.
    pub fn unlabelled(width: usize, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns: (0..width).map(ColumnLabel::Unnamed).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first column labelled `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|label| label.matches(name))
    }

    /// Iterates over the cells of one column.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&CellValue::Empty))
    }

    /// Returns a description of the first row whose width differs from the
    /// number of columns.
    pub fn check_shape(&self) -> std::result::Result<(), String> {
        let width = self.columns.len();
        match self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != width)
        {
            Some((index, row)) => Err(format!(
                "row {index} has {} cells but the sheet has {width} columns",
                row.len()
            )),
            None => Ok(()),
        }
    }
}

/// A table paired with the worksheet name it will be written under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

/// Every table produced by a run, in the order they will be written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputBundle {
    pub tables: Vec<NamedTable>,
}

impl OutputBundle {
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.table)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|named| named.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A worksheet as loaded from a source workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSheet {
    pub name: String,
    pub table: Table,
}

/// All worksheets of a source workbook in workbook order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceWorkbook {
    pub sheets: Vec<SourceSheet>,
}
