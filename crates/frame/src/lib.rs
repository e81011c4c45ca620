//! Cartflow - Frame
//!
//! The typed in-memory table model that flows through the pipeline.
//!
//! # Architecture
//!
//! ```text
//! Value  - tagged sum over the supported cell types
//! Column - homogeneously typed series with per-type storage
//! Table  - ordered collection of named columns of equal length,
//!          carrying a millisecond ingest timestamp
//! ```
//!
//! # Key Design
//!
//! - **Closed tagged sum**: cells are one of int32, int64, float32, float64,
//!   string or character. Comparisons and formatting dispatch on the tag;
//!   a cross-family comparison is a deterministic `TypeMismatch`.
//! - **Null is the zero value**: appending [`Value::Null`] materializes the
//!   column type's zero value. Columns never store a null tag.
//! - **Tables are values, not graphs**: columns are owned by their table and
//!   `Clone` is a deep copy, which is what makes fan-out isolation in the
//!   pipeline possible.
//! - **Lazy column typing**: a table built from column names fixes each
//!   column's element type from the first row it observes.
//!
//! # Example
//!
//! ```
//! use cartflow_frame::{CompareOp, Table, Value};
//!
//! let mut table = Table::with_names(["product", "views"]);
//! table.add_row(vec![Value::Str("P1".into()), Value::Int32(3)]).unwrap();
//! table.add_row(vec![Value::Str("P2".into()), Value::Int32(7)]).unwrap();
//!
//! table
//!     .filter_by_column("views", &Value::Int32(5), CompareOp::Gt)
//!     .unwrap();
//! assert_eq!(table.row_count(), 1);
//! ```

mod column;
mod error;
mod table;
mod value;

pub use column::Column;
pub use error::{FrameError, Result};
pub use table::Table;
pub use value::{CompareOp, TypeTag, Value, compare};
