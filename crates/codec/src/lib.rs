//! Cartflow - Codec
//!
//! Delimited text in, delimited text out.
//!
//! # Format
//!
//! The first physical line is a header of column names separated by the
//! configured delimiter. Every following line is one row. There is no
//! quoting. Column types are inferred from the first data row, preferring
//! the narrowest of int32, int64, float32, character (length 1) and string;
//! later rows must parse under the fixed types.
//!
//! # Strategies
//!
//! - [`decode_file`] with [`DecodeOptions::stop_on_empty`] set - the
//!   reference CSV strategy: an empty cell drops the row and stops
//!   ingesting that file.
//! - [`decode_file`] without it - the log/text strategy: malformed rows are
//!   skipped with a warning and decoding continues.
//! - [`decode_lines`] - the line-batch strategy used by the report
//!   endpoint: no file I/O, the header is supplied by the caller and every
//!   element is one row.
//!
//! The encoder writes the header plus one line per row with the same
//! delimiter, to a temp file renamed into place so readers never observe a
//! partial write.

mod decode;
mod encode;
mod error;
mod infer;

pub use decode::{DecodeOptions, decode_file, decode_lines};
pub use encode::encode_file;
pub use error::{CodecError, Result};
pub use infer::{infer_tag, parse_as};
