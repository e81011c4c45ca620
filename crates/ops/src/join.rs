//! Left equijoin operator

use cartflow_frame::{Result, Table};

use crate::Handler;

/// Joins the streaming left side against a right table fixed at
/// construction
///
/// Misses append the zero value of each right column; duplicate right
/// keys resolve to the last occurrence.
#[derive(Debug, Clone)]
pub struct LeftJoinHandler {
    right: Table,
    key: String,
    drop_key: bool,
}

impl LeftJoinHandler {
    pub fn new(right: Table, key: impl Into<String>, drop_key: bool) -> Self {
        Self {
            right,
            key: key.into(),
            drop_key,
        }
    }
}

impl Handler for LeftJoinHandler {
    fn name(&self) -> &'static str {
        "left-join"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        table.left_join(&self.right, &self.key, self.drop_key)
    }
}
