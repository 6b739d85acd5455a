//! Header reconciliation and row classification.
//!
//! The stages run leaf to root: [`synonyms`] turns the template into a
//! lookup table, [`header`] recovers a usable header row, [`mapper`]
//! projects sheets onto the canonical fields, [`classify`] sorts and splits
//! rows by purchase-order validity, and [`workbook`] drives all of it per
//! sheet.

pub mod classify;
pub mod fields;
pub mod header;
pub mod mapper;
pub mod synonyms;
pub mod workbook;

pub use fields::CanonicalFields;
pub use synonyms::SynonymTable;
pub use workbook::{SheetOutcome, SkipReason, WorkbookReport, process_sheet, process_workbook};
