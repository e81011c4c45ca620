//! Delimited text decoding
//!
//! Shared row loop for the file and line-batch strategies. The header
//! creates a lazily typed table; the first data row fixes the column types
//! through inference; every later row parses under those types.

use std::fs;
use std::path::Path;

use cartflow_frame::{Table, Value};

use crate::error::{CodecError, Result};
use crate::infer::{infer_tag, parse_as};

/// Decoding options
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Cell separator, identical for input and output
    pub delimiter: char,
    /// Reference-CSV behavior: an empty cell drops the row and stops the file
    pub stop_on_empty: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            delimiter: ';',
            stop_on_empty: false,
        }
    }
}

impl DecodeOptions {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stop_on_empty(mut self) -> Self {
        self.stop_on_empty = true;
        self
    }
}

/// Decode a delimited file; the first line is the header
pub fn decode_file(path: &Path, options: &DecodeOptions) -> Result<Table> {
    let contents = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
    let mut lines = contents.lines();
    let header = lines.next().ok_or(CodecError::MissingHeader)?;
    decode_rows(header, lines, options)
}

/// Decode a batch of lines under a caller-supplied header
///
/// The line-batch strategy of the report endpoint: every element is one
/// data row, trailing newlines optional.
pub fn decode_lines<I, S>(header: &str, lines: I, options: &DecodeOptions) -> Result<Table>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    decode_rows(header, lines, options)
}

fn decode_rows<I, S>(header: &str, rows: I, options: &DecodeOptions) -> Result<Table>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let header = header.trim_end_matches(['\r', '\n']);
    if header.is_empty() {
        return Err(CodecError::MissingHeader);
    }

    let names: Vec<&str> = header.split(options.delimiter).collect();
    let width = names.len();
    let mut table = Table::with_names(names);

    // Line numbers are 1-based with the header on line 1
    for (index, row) in rows.into_iter().enumerate() {
        let line = index + 2;
        let row = row.as_ref().trim_end_matches(['\r', '\n']);
        if row.is_empty() {
            continue;
        }

        let cells: Vec<&str> = row.split(options.delimiter).collect();
        if cells.len() != width {
            tracing::warn!(
                line,
                expected = width,
                found = cells.len(),
                "skipping row with wrong width"
            );
            continue;
        }

        if cells.iter().any(|cell| cell.is_empty()) {
            tracing::warn!(line, row, "empty cell in row, dropping it");
            if options.stop_on_empty {
                break;
            }
            continue;
        }

        let values = match parse_row(&table, &cells) {
            Ok(values) => values,
            Err(reason) => {
                tracing::warn!(line, reason, "skipping malformed row");
                continue;
            }
        };
        table.add_row(values)?;
    }

    Ok(table)
}

/// Parse one row's cells, inferring types on the first data row
fn parse_row(table: &Table, cells: &[&str]) -> std::result::Result<Vec<Value>, String> {
    let mut values = Vec::with_capacity(cells.len());
    for (column, cell) in cells.iter().enumerate() {
        let tag = table
            .column_tag(column)
            .unwrap_or_else(|| infer_tag(cell));
        values.push(parse_as(tag, cell)?);
    }
    Ok(values)
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
