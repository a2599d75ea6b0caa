//! Reads translation CSV files in the export format

use crate::core::export::CSV_HEADER;
use crate::domain::{Result, TermportError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One data line of an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the file
    pub line: u64,
    pub original_name: String,
    pub translated_name: String,
}

/// Read and validate a translation file
///
/// # Errors
///
/// Returns `TermportError::Validation` when the header is not
/// `Original Name,Translated Name`, `TermportError::Csv` for malformed
/// lines, and `TermportError::Io` when the file cannot be opened.
pub fn read_translation_file(path: impl AsRef<Path>) -> Result<Vec<ImportRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        TermportError::Io(format!("Failed to open {}: {}", path.display(), e))
    })?;
    read_translations(file)
}

/// Read translation rows from any reader
pub fn read_translations<R: Read>(reader: R) -> Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns: Vec<&str> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .map(str::trim)
        .collect();

    if columns != CSV_HEADER {
        return Err(TermportError::Validation(format!(
            "Expected header '{}', found '{}'",
            CSV_HEADER.join(","),
            columns.join(",")
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        rows.push(ImportRow {
            line,
            original_name: record.get(0).unwrap_or_default().to_string(),
            translated_name: record.get(1).unwrap_or_default().trim().to_string(),
        });
    }

    Ok(rows)
}
