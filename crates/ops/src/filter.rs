//! Row filter operator

use cartflow_frame::{CompareOp, Result, Table, Value};

use crate::Handler;

/// Keeps the rows where `column <op> probe` holds
///
/// Stateless; the probe is fixed at construction. Filtering happens in
/// place before the node fans the table out.
#[derive(Debug, Clone)]
pub struct FilterHandler {
    column: String,
    probe: Value,
    op: CompareOp,
}

impl FilterHandler {
    pub fn new(column: impl Into<String>, probe: Value, op: CompareOp) -> Self {
        Self {
            column: column.into(),
            probe,
            op,
        }
    }

    /// Shorthand for the common equality filter on a string column
    pub fn equals(column: impl Into<String>, probe: impl Into<String>) -> Self {
        Self::new(column, Value::Str(probe.into()), CompareOp::Eq)
    }
}

impl Handler for FilterHandler {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn apply(&self, mut table: Table) -> Result<Table> {
        table.filter_by_column(&self.column, &self.probe, self.op)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_batch() -> Table {
        let mut table = Table::with_names(["type", "extra_1"]);
        for (kind, action) in [
            ("User", "ZOOM"),
            ("User", "SCROLL"),
            ("Audit", "BUY"),
            ("User", "ZOOM"),
        ] {
            table
                .add_row(vec![Value::Str(kind.into()), Value::Str(action.into())])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_keeps_matching_rows() {
        let handler = FilterHandler::equals("type", "User");
        let out = handler.apply(log_batch()).unwrap();

        assert_eq!(out.row_count(), 3);
        for row in 0..out.row_count() {
            assert_eq!(out.cell_str(row, "type").unwrap(), "User");
        }
    }

    #[test]
    fn test_chained_filters() {
        let first = FilterHandler::equals("type", "User");
        let second = FilterHandler::equals("extra_1", "ZOOM");

        let out = second.apply(first.apply(log_batch()).unwrap()).unwrap();
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let handler = FilterHandler::equals("nope", "User");
        assert!(handler.apply(log_batch()).is_err());
    }

    #[test]
    fn test_numeric_comparison() {
        let mut table = Table::with_names(["qty"]);
        for qty in [1, 5, 9] {
            table.add_row(vec![Value::Int32(qty)]).unwrap();
        }

        let handler = FilterHandler::new("qty", Value::Int32(5), CompareOp::Ge);
        let out = handler.apply(table).unwrap();
        assert_eq!(out.row_count(), 2);
    }
}
