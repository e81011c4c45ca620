//! Result slots
//!
//! One slot per analytic holds the currently folded result table plus the
//! latency samples collected since the last flush. The mutex is the only
//! cross-task shared state besides the queues; holders must not perform
//! blocking I/O (the sink takes the tables out and writes after release).

use std::sync::Mutex;

use cartflow_frame::Table;

/// Contents of a result slot
#[derive(Debug, Default)]
pub struct SlotState {
    /// Folded result of all arrivals since the last flush
    pub result: Option<Table>,
    /// One `(now - arrival.timestamp_ms)` sample per arrival
    pub latency: Option<Table>,
}

/// Mutex-protected accumulator for one analytic
#[derive(Debug)]
pub struct ResultSlot {
    name: String,
    state: Mutex<SlotState>,
}

impl ResultSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(SlotState::default()),
        }
    }

    /// The analytic this slot accumulates
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a closure under the slot lock
    ///
    /// Keeps all locking inside the slot; the closure must not block.
    pub fn with<R>(&self, f: impl FnOnce(&mut SlotState) -> R) -> R {
        let mut state = self.state.lock().expect("slot mutex poisoned");
        f(&mut state)
    }

    /// Snapshot and clear the slot
    pub fn take(&self) -> (Option<Table>, Option<Table>) {
        let mut state = self.state.lock().expect("slot mutex poisoned");
        (state.result.take(), state.latency.take())
    }

    /// Whether a result is currently accumulated
    pub fn has_result(&self) -> bool {
        self.state
            .lock()
            .expect("slot mutex poisoned")
            .result
            .is_some()
    }
}
