use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

pub const PURCHASE_ORDER: &str = "Purchase Order";
pub const INVOICE: &str = "Invoice";
pub const INVOICE_DATE: &str = "Invoice Date";
pub const INVOICE_VALUE: &str = "Invoice Value";
pub const PAYEE_NUMBER: &str = "Payee Number";

/// Ordered list of canonical output fields together with the two fields the
/// row classifier relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonicalFields {
    /// Output column names, in output order.
    pub names: Vec<String>,
    /// Field whose synonyms locate the purchase-order column.
    pub purchase_order: String,
    /// Field whose synonyms locate the column rows are sorted by.
    pub invoice_date: String,
}

impl Default for CanonicalFields {
    fn default() -> Self {
        Self {
            names: [PURCHASE_ORDER, INVOICE, INVOICE_DATE, INVOICE_VALUE, PAYEE_NUMBER]
                .into_iter()
                .map(str::to_string)
                .collect(),
            purchase_order: PURCHASE_ORDER.to_string(),
            invoice_date: INVOICE_DATE.to_string(),
        }
    }
}

impl CanonicalFields {
    /// Checks that the names are non-empty and unique and that both role
    /// fields are among them.
    pub fn validate(&self) -> Result<()> {
        if self.names.is_empty() {
            return Err(ToolError::InvalidFields("no field names configured".into()));
        }

        let mut seen = HashSet::new();
        for name in &self.names {
            if name.trim().is_empty() {
                return Err(ToolError::InvalidFields("blank field name".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ToolError::InvalidFields(format!(
                    "duplicate field name '{name}'"
                )));
            }
        }

        for (role, name) in [
            ("purchase order", &self.purchase_order),
            ("invoice date", &self.invoice_date),
        ] {
            if !seen.contains(name.as_str()) {
                return Err(ToolError::InvalidFields(format!(
                    "{role} field '{name}' is not one of the configured names"
                )));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
