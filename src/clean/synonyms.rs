use serde::Serialize;
use tracing::debug;

use crate::clean::fields::CanonicalFields;
use crate::error::{Result, ToolError};
use crate::model::{CellValue, Table};

/// Accepted physical column names for one canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSynonyms {
    pub field: String,
    pub synonyms: Vec<String>,
}

/// Canonical field → accepted column names, in canonical field order.
///
/// Built once per run from the template and passed by reference to every
/// stage that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymTable {
    entries: Vec<FieldSynonyms>,
    #[serde(skip)]
    purchase_order: String,
    #[serde(skip)]
    invoice_date: String,
}

impl SynonymTable {
    /// Builds the table from a template whose Nth column lists the
    /// synonyms of the Nth canonical field. The template's own header text
    /// is ignored; only column position counts.
    pub fn from_template(template: &Table, fields: &CanonicalFields) -> Result<Self> {
        fields.validate()?;
        if template.columns.len() != fields.len() {
            return Err(ToolError::TemplateMismatch {
                expected: fields.len(),
                found: template.columns.len(),
            });
        }

        let entries = fields
            .names
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let mut synonyms: Vec<String> = Vec::new();
                for cell in template.column_cells(index) {
                    if is_template_filler(cell) {
                        continue;
                    }
                    let synonym = cell.to_text();
                    if !synonyms.contains(&synonym) {
                        synonyms.push(synonym);
                    }
                }
                debug!(field = %field, count = synonyms.len(), "collected synonyms");
                FieldSynonyms {
                    field: field.clone(),
                    synonyms,
                }
            })
            .collect();

        Ok(Self {
            entries,
            purchase_order: fields.purchase_order.clone(),
            invoice_date: fields.invoice_date.clone(),
        })
    }

    /// Builds a table directly from `(field, synonyms)` pairs. The role
    /// fields default to the canonical "Purchase Order" / "Invoice Date".
    pub fn from_entries<I, F, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (F, Vec<S>)>,
        F: Into<String>,
        S: Into<String>,
    {
        let defaults = CanonicalFields::default();
        Self {
            entries: entries
                .into_iter()
                .map(|(field, synonyms)| FieldSynonyms {
                    field: field.into(),
                    synonyms: synonyms.into_iter().map(Into::into).collect(),
                })
                .collect(),
            purchase_order: defaults.purchase_order,
            invoice_date: defaults.invoice_date,
        }
    }

    pub fn entries(&self) -> &[FieldSynonyms] {
        &self.entries
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.field.as_str())
    }

    /// Synonyms for `field`, or an empty slice for an unknown field.
    pub fn synonyms(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.synonyms.as_slice())
            .unwrap_or(&[])
    }

    pub fn purchase_order_synonyms(&self) -> &[String] {
        self.synonyms(&self.purchase_order)
    }

    pub fn invoice_date_synonyms(&self) -> &[String] {
        self.synonyms(&self.invoice_date)
    }
}

// Short template columns are padded with blanks, and legacy templates pad
// them with literal zeros.
fn is_template_filler(cell: &CellValue) -> bool {
    match cell {
        CellValue::Empty => true,
        CellValue::Number(value) => *value == 0.0,
        CellValue::Text(value) => value.trim().is_empty(),
        _ => false,
    }
}
