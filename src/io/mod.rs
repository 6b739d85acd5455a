//! Spreadsheet adapters. Reading goes through `calamine`, writing through
//! `rust_xlsxwriter`; both convert to and from the [`crate::model`] types.

pub mod excel_read;
pub mod excel_write;
