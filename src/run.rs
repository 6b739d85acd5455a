use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::clean::workbook::SheetReport;
use crate::clean::{SynonymTable, process_workbook};
use crate::config::CleanerConfig;
use crate::error::Result;
use crate::io::{excel_read, excel_write};
use crate::model::{NamedTable, OutputBundle};

/// What a cleaning run did, suitable for serialising as a JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sheets: Vec<SheetReport>,
    /// Worksheet names written to the output, in order.
    pub written: Vec<String>,
}

/// Builds the synonym table from the configured template.
#[instrument(level = "info", skip_all, fields(template = %config.template_path().display()))]
pub fn load_synonyms(config: &CleanerConfig) -> Result<SynonymTable> {
    let template = excel_read::read_template(&config.template_path())?;
    let synonyms = SynonymTable::from_template(&template, &config.fields)?;
    info!(field_count = synonyms.entries().len(), "synonym table built");
    Ok(synonyms)
}

/// Cleans every sheet of `input` and writes the results to `output`,
/// appending to it when it already exists.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn clean_file(input: &Path, output: &Path, config: &CleanerConfig) -> Result<RunSummary> {
    let synonyms = load_synonyms(config)?;
    let source = excel_read::read_workbook(input, config.header_row)?;
    info!(sheet_count = source.sheets.len(), "read source workbook");

    let mut bundle = OutputBundle::default();
    if config.copy_source_sheets {
        bundle.tables.extend(
            source
                .sheets
                .iter()
                .map(|sheet| NamedTable::new(sheet.name.clone(), sheet.table.clone())),
        );
    }

    let report = process_workbook(source, &synonyms);
    let failed = report.failures().count();
    bundle.tables.extend(report.bundle.tables);

    let written = excel_write::write_bundle(output, &bundle)?;
    info!(
        written = written.len(),
        failed_sheets = failed,
        "cleaning run finished"
    );

    Ok(RunSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        sheets: report.sheets,
        written,
    })
}
