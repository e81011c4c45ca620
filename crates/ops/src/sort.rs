//! Stable sort operator

use cartflow_frame::{Result, Table};

use crate::Handler;

/// Sorts the table by one column, ascending or descending
///
/// The sort is stable, so equal keys keep their arrival order.
#[derive(Debug, Clone)]
pub struct SortHandler {
    column: String,
    ascending: bool,
}

impl SortHandler {
    pub fn new(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            column: column.into(),
            ascending,
        }
    }
}

impl Handler for SortHandler {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn apply(&self, mut table: Table) -> Result<Table> {
        table.sort_by_column(&self.column, self.ascending)?;
        Ok(table)
    }
}
