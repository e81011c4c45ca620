//! Cartflow - Triggers
//!
//! Periodic drivers that fan tick notifications out to registered
//! observers.
//!
//! # Kinds
//!
//! - [`TimerTrigger`] fires a **time tick** at a fixed period. Ingestion
//!   runs on a short one; the per-minute and per-hour output flushes each
//!   get their own.
//! - [`RequestTrigger`] fires a **request tick** after a uniform-random
//!   sleep in a closed millisecond interval, simulating ad-hoc request
//!   traffic.
//!
//! # Lifecycle
//!
//! `Created → Active → Stopping → Stopped`. Observers register while the
//! trigger is `Created`; `activate` spawns exactly one driver task holding
//! a cancellation token; `deactivate` cancels it and waits for it to park.
//! Observers are notified sequentially in registration order, each with the
//! tick kind matching the trigger.

mod error;
mod observer;
mod request;
mod timer;

pub use error::TriggerError;
pub use observer::Observer;
pub use request::RequestTrigger;
pub use timer::TimerTrigger;

/// Trigger lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Created,
    Active,
    Stopping,
    Stopped,
}
