//! Value occurrence operator

use cartflow_frame::{Result, Table};

use crate::Handler;

/// Produces the `{Value, Count}` occurrences of one column
#[derive(Debug, Clone)]
pub struct ValueCountHandler {
    column: String,
}

impl ValueCountHandler {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Handler for ValueCountHandler {
    fn name(&self) -> &'static str {
        "value-count"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        table.value_counts(&self.column)
    }
}
