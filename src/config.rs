use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clean::CanonicalFields;
use crate::error::Result;

/// File name of the synonym template looked up in the working directory.
pub const DEFAULT_TEMPLATE: &str = "Template.xlsx";

/// Settings for a cleaning run. Every field has a default, so a JSON config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanerConfig {
    /// Directory relative input, template and output paths resolve against.
    pub directory: PathBuf,
    /// Synonym template workbook.
    pub template: PathBuf,
    /// Rows skipped at the top of each source sheet before the header row.
    pub header_row: usize,
    /// Copy the untouched source sheets into the output workbook ahead of
    /// the cleaned tables.
    pub copy_source_sheets: bool,
    pub fields: CanonicalFields,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            header_row: 0,
            copy_source_sheets: true,
            fields: CanonicalFields::default(),
        }
    }
}

impl CleanerConfig {
    /// Loads a configuration file, validating the canonical fields.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: CleanerConfig = serde_json::from_str(&data)?;
        config.fields.validate()?;
        Ok(config)
    }

    /// Resolves `path` against [`CleanerConfig::directory`] unless it is
    /// already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.directory.join(path)
        }
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.template)
    }
}

/// Appends `.xlsx` to names given without an extension.
pub fn with_xlsx_extension(input: &Path) -> PathBuf {
    if input.extension().is_some() {
        input.to_path_buf()
    } else {
        input.with_extension("xlsx")
    }
}

/// Default output location: `"<input stem> output.xlsx"` beside the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    input.with_file_name(format!("{stem} output.xlsx"))
}
