//! Raw matrix decoding for the input boundary
//!
//! The ingestion pipeline operates on a two-dimensional matrix of cell
//! strings (row 0 = headers). This module produces that matrix from the two
//! supported sources: delimited text files and pasted tab/newline-delimited
//! text. Cell values are never interpreted here.

use crate::error::{ClaimdiffError, Result};
use std::path::Path;

/// Raw cell matrix: row 0 is the header row, rows 1..n are data rows.
pub type RawMatrix = Vec<Vec<String>>;

/// Check if a file extension is a supported delimited-text format. Binary
/// spreadsheet containers must be exported to CSV/TSV first.
pub fn is_supported_format(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref(),
        Some("csv" | "tsv" | "tab" | "txt")
    )
}

/// Decode a delimited-text file into a raw matrix. The delimiter follows the
/// extension: tab for `.tsv`/`.tab`/`.txt`, comma otherwise.
pub fn read_matrix(path: &Path) -> Result<RawMatrix> {
    if !path.exists() {
        return Err(ClaimdiffError::invalid_input(format!(
            "File not found: {}",
            path.display()
        )));
    }
    if !is_supported_format(path) {
        return Err(ClaimdiffError::invalid_input(format!(
            "Unsupported file format: {} (export spreadsheets to CSV or TSV first)",
            path.display()
        )));
    }

    let delimiter = match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref()
    {
        Some("tsv" | "tab" | "txt") => b'\t',
        _ => b',',
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;

    let mut matrix = Vec::new();
    for record in reader.records() {
        let record = record?;
        matrix.push(record.iter().map(str::to_string).collect());
    }

    log::debug!("Decoded {} rows from {}", matrix.len(), path.display());
    Ok(matrix)
}

/// Split pasted text into a raw matrix: newline-delimited rows,
/// tab-delimited cells. A trailing carriage return per line is dropped.
pub fn matrix_from_pasted(text: &str) -> RawMatrix {
    text.lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}
