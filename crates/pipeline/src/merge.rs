//! Result-merge tasks
//!
//! One merge node per analytic folds terminal-queue arrivals into the
//! analytic's result slot and records the batch's pipeline latency. All
//! folding happens under the slot lock; the fold itself is pure table
//! work and never blocks.

use std::sync::Arc;

use cartflow_frame::{Table, Value};
use cartflow_runtime::{BoundedQueue, ResultSlot};

/// Folds one terminal queue into one result slot
pub struct MergeNode {
    input: Arc<BoundedQueue<Table>>,
    slot: Arc<ResultSlot>,
    key_col: String,
    sum_col: String,
}

impl MergeNode {
    pub fn new(
        input: Arc<BoundedQueue<Table>>,
        slot: Arc<ResultSlot>,
        key_col: impl Into<String>,
        sum_col: impl Into<String>,
    ) -> Self {
        Self {
            input,
            slot,
            key_col: key_col.into(),
            sum_col: sum_col.into(),
        }
    }

    /// Fold everything currently buffered into the slot
    ///
    /// The first arrival seeds the slot; later arrivals are merged with
    /// merge-and-sum, choosing the grand-total rule for single-column
    /// tables. A fold error drops that arrival and keeps the accumulated
    /// result.
    pub async fn drain(&self) {
        while !self.input.is_empty() {
            let Ok(table) = self.input.pop().await else {
                break;
            };

            let now = chrono::Utc::now().timestamp_millis();
            let sample = now - table.timestamp_ms();

            let fold = self.slot.with(|state| {
                let latency = state
                    .latency
                    .get_or_insert_with(|| Table::with_names(["time"]));
                if let Err(error) = latency.add_row(vec![Value::Int64(sample)]) {
                    tracing::warn!(analytic = self.slot.name(), %error, "latency sample lost");
                }

                match state.result.take() {
                    None => {
                        state.result = Some(table);
                        Ok(())
                    }
                    Some(accumulated) => {
                        // Single-column tables fold as a grand total
                        let key = if table.column_count() == 1 {
                            ""
                        } else {
                            self.key_col.as_str()
                        };
                        match Table::merge_and_sum(&accumulated, &table, key, &self.sum_col) {
                            Ok(merged) => {
                                state.result = Some(merged);
                                Ok(())
                            }
                            Err(error) => {
                                state.result = Some(accumulated);
                                Err(error)
                            }
                        }
                    }
                }
            });

            if let Err(error) = fold {
                tracing::warn!(
                    analytic = self.slot.name(),
                    %error,
                    "dropping unmergeable arrival"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
