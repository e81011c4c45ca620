//! Row count operator

use cartflow_frame::{Result, Table, Value};

use crate::Handler;

/// Produces a one-row `{Count: int32}` table with the input's row count
///
/// The output inherits the input's ingest timestamp so latency can still
/// be measured downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountLinesHandler;

impl Handler for CountLinesHandler {
    fn name(&self) -> &'static str {
        "count-lines"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        let mut out = Table::with_names(["Count"]);
        out.add_row(vec![Value::Int32(table.row_count() as i32)])?;
        out.set_timestamp_ms(table.timestamp_ms());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_rows() {
        let mut table = Table::with_names(["x"]);
        for i in 0..4 {
            table.add_row(vec![Value::Int32(i)]).unwrap();
        }
        table.set_timestamp_ms(777);

        let out = CountLinesHandler.apply(table).unwrap();
        assert_eq!(out.names(), &["Count"]);
        assert_eq!(out.cell(0, "Count").unwrap(), Value::Int32(4));
        assert_eq!(out.timestamp_ms(), 777);
    }

    #[test]
    fn test_empty_input_counts_zero() {
        let table = Table::with_names(["x"]);
        let out = CountLinesHandler.apply(table).unwrap();
        assert_eq!(out.cell(0, "Count").unwrap(), Value::Int32(0));
    }
}
