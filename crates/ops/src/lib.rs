//! Cartflow - Ops
//!
//! The single-purpose operators that make up the dataflow graph, plus the
//! [`HandlerNode`] loop that drives one of them over a pair of queues.
//!
//! # Contract
//!
//! Every operator is a [`Handler`]: it takes one table and produces one
//! table (in-place operators mutate and hand the same table back). A
//! [`HandlerNode`] pops from its input queue while it is non-empty, applies
//! the operator and fans the result out — **one deep copy per output
//! queue** — so no two downstream stages ever share a table. An operator
//! error drops that batch with a warning and the loop continues; a handler
//! never takes its worker down.
//!
//! # Operators
//!
//! | Handler | Effect |
//! |---------|--------|
//! | [`CopyHandler`] | identity (pure fan-out) |
//! | [`FilterHandler`] | keep rows matching `column <op> probe` |
//! | [`CountLinesHandler`] | one-row `{Count}` table with the row count |
//! | [`ValueCountHandler`] | `{Value, Count}` occurrences of a column |
//! | [`SortHandler`] | stable sort by a column |
//! | [`LeftJoinHandler`] | left equijoin against a fixed right table |
//! | [`MergeSumHandler`] | merge-and-sum of a captured table pair |

mod count;
mod filter;
mod join;
mod merge_sum;
mod node;
mod sort;
mod value_count;

pub use count::CountLinesHandler;
pub use filter::FilterHandler;
pub use join::LeftJoinHandler;
pub use merge_sum::MergeSumHandler;
pub use node::{HandlerNode, NodeMetrics, NodeMetricsSnapshot};
pub use sort::SortHandler;
pub use value_count::ValueCountHandler;

use cartflow_frame::{Result, Table};

/// A single-purpose table operator
pub trait Handler: Send + Sync {
    /// Operator name for logs and metrics
    fn name(&self) -> &'static str;

    /// Apply the operator to one batch
    fn apply(&self, table: Table) -> Result<Table>;
}

/// Identity operator: the node's fan-out does all the work
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyHandler;

impl Handler for CopyHandler {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn apply(&self, table: Table) -> Result<Table> {
        Ok(table)
    }
}

#[cfg(test)]
mod copy_test {
    use super::*;
    use cartflow_frame::Value;

    #[test]
    fn test_copy_is_identity() {
        let mut table = Table::with_names(["x"]);
        table.add_row(vec![Value::Int32(1)]).unwrap();

        let out = CopyHandler.apply(table.clone()).unwrap();
        assert_eq!(out, table);
    }
}
