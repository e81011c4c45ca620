//! Merge-and-sum operator over a captured table pair

use cartflow_frame::{Result, Table};

use crate::Handler;

/// Emits the merge-and-sum of two tables captured at construction
///
/// The streaming input only paces the node; its content is ignored. Used
/// for post-aggregation of a pair of already-computed summaries.
#[derive(Debug, Clone)]
pub struct MergeSumHandler {
    left: Table,
    right: Table,
    key_col: String,
    sum_col: String,
}

impl MergeSumHandler {
    pub fn new(
        left: Table,
        right: Table,
        key_col: impl Into<String>,
        sum_col: impl Into<String>,
    ) -> Self {
        Self {
            left,
            right,
            key_col: key_col.into(),
            sum_col: sum_col.into(),
        }
    }
}

impl Handler for MergeSumHandler {
    fn name(&self) -> &'static str {
        "merge-sum"
    }

    fn apply(&self, _table: Table) -> Result<Table> {
        Table::merge_and_sum(&self.left, &self.right, &self.key_col, &self.sum_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartflow_frame::Value;

    fn counts(rows: &[(&str, i32)]) -> Table {
        let mut table = Table::with_names(["Value", "Count"]);
        for (value, count) in rows {
            table
                .add_row(vec![Value::Str((*value).into()), Value::Int32(*count)])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_ignores_input_and_merges_pair() {
        let handler = MergeSumHandler::new(
            counts(&[("P1", 2), ("P2", 1)]),
            counts(&[("P1", 1), ("P3", 2)]),
            "Value",
            "Count",
        );

        let pacing_input = Table::with_names(["unused"]);
        let out = handler.apply(pacing_input).unwrap();

        assert_eq!(out.row_count(), 3);
        assert_eq!(out.cell(0, "Count").unwrap(), Value::Int32(3));
    }
}
