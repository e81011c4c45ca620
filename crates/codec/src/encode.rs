//! Delimited text encoding
//!
//! Writes the header line followed by one row per line, separator identical
//! to input, no quoting. The file lands via temp-file plus rename so a
//! concurrent reader never observes a partial write.

use std::fs;
use std::path::Path;

use cartflow_frame::Table;

use crate::error::{CodecError, Result};

/// Serialize a table to a delimited file, atomically
pub fn encode_file(table: &Table, path: &Path, delimiter: char) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| CodecError::io(parent, e))?;
    }

    let mut out = String::new();
    push_line(&mut out, table.names().iter().map(String::as_str), delimiter);

    for row in 0..table.row_count() {
        let mut cells = Vec::with_capacity(table.column_count());
        for name in table.names() {
            cells.push(table.cell_str(row, name)?);
        }
        push_line(&mut out, cells.iter().map(String::as_str), delimiter);
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, out).map_err(|e| CodecError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| CodecError::io(path, e))?;
    Ok(())
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, delimiter: char) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(delimiter);
        }
        out.push_str(cell);
        first = false;
    }
    out.push('\n');
}
