//! Attendee list loading.
//!
//! An attendee list is a spreadsheet or delimited text file whose first
//! column holds recipient names. Names are read top to bottom; empty and
//! missing cells are skipped.
//!
//! # Example
//!
//! ```no_run
//! use certgen::attendees::{load_names, AttendeeKind, LoadOptions};
//!
//! let data = std::fs::read("attendees.csv")?;
//! let recipients = load_names(&data, AttendeeKind::Delimited, &LoadOptions::default())?;
//! println!("Loaded {} names", recipients.len());
//! # Ok::<(), certgen::Error>(())
//! ```

mod delimited;
mod spreadsheet;

use std::fs;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::Recipient;

/// Declared kind of an attendee file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeKind {
    /// OOXML workbook (`.xlsx`, `.xlsm`)
    Spreadsheet,
    /// Comma or tab separated text (`.csv`, `.tsv`, `.txt`)
    Delimited,
}

impl AttendeeKind {
    /// Map a file extension to an attendee kind.
    ///
    /// Legacy `.xls` workbooks are recognised but rejected.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" => Ok(AttendeeKind::Spreadsheet),
            "csv" | "tsv" | "txt" => Ok(AttendeeKind::Delimited),
            "xls" => Err(Error::UnsupportedFormat(
                "legacy .xls workbooks are not supported; save the list as .xlsx or .csv".into(),
            )),
            other => Err(Error::UnsupportedFormat(format!(
                "attendee lists must be .xlsx, .csv, .tsv or .txt (got .{})",
                other
            ))),
        }
    }

    /// Derive the kind from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat("attendee file has no extension".into()))?;
        Self::from_extension(ext)
    }

    /// Whether the first row is a header unless told otherwise.
    pub fn default_has_header(self) -> bool {
        matches!(self, AttendeeKind::Spreadsheet)
    }
}

/// Options for loading attendee lists.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Treat the first row as a header. `None` uses the kind's default.
    pub has_header: Option<bool>,

    /// Field delimiter for delimited text
    pub delimiter: u8,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force header handling on or off.
    pub fn with_header(mut self, has_header: Option<bool>) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the field delimiter for delimited text.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn header_for(&self, kind: AttendeeKind) -> bool {
        self.has_header.unwrap_or_else(|| kind.default_has_header())
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: None,
            delimiter: b',',
        }
    }
}

/// Load recipient names from bytes of a declared kind.
pub fn load_names(data: &[u8], kind: AttendeeKind, options: &LoadOptions) -> Result<Vec<Recipient>> {
    let has_header = options.header_for(kind);
    let cells = match kind {
        AttendeeKind::Delimited => delimited::first_column(data, options.delimiter, has_header)?,
        AttendeeKind::Spreadsheet => spreadsheet::first_column(data, has_header)?,
    };

    let total = cells.len();
    let names: Vec<String> = cells
        .into_iter()
        .flatten()
        .map(|cell| cell.trim().nfc().collect::<String>())
        .filter(|name| !name.is_empty())
        .collect();

    if names.len() < total {
        log::warn!("Skipped {} row(s) with an empty first column", total - names.len());
    }

    if names.is_empty() {
        return Err(Error::Load(
            "no attendee names found in the first column".into(),
        ));
    }

    log::info!("Loaded {} attendee name(s)", names.len());
    Ok(Recipient::from_names(names))
}

/// Load recipient names from a file, deriving the kind from its extension.
///
/// `.tsv` files default to a tab delimiter.
pub fn load_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Vec<Recipient>> {
    let path = path.as_ref();
    let kind = AttendeeKind::from_path(path)?;
    let data = fs::read(path)?;

    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    if is_tsv && options.delimiter == b',' {
        return load_names(&data, kind, &options.clone().with_delimiter(b'\t'));
    }

    load_names(&data, kind, options)
}
