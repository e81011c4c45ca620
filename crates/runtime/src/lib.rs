//! Cartflow - Runtime
//!
//! The concurrency primitives under the dataflow graph.
//!
//! # Architecture
//!
//! ```text
//! [Producer] --push().await--> [BoundedQueue] --pop().await--> [Consumer]
//!                                    |
//!                              close() wakes both sides
//!
//! [submit()] --> [task queue] --> [worker 0..N] --> future runs to completion
//! ```
//!
//! # Key Design
//!
//! - **Counting-semaphore queue**: `BoundedQueue` pairs an `empty_slots` and
//!   a `full_slots` semaphore around a mutexed FIFO, so both sides block
//!   (asynchronously) and memory stays bounded.
//! - **Close sentinel**: `close()` wakes every waiter; producers get
//!   `QueueClosed` immediately, consumers drain the remaining items first.
//!   This is what lets the pipeline tear down without racing a drain loop.
//! - **Fixed worker pool**: `WorkerPool` runs submitted futures on a fixed
//!   number of workers fed from a shared queue; shutdown drains outstanding
//!   tasks and joins the workers.
//! - **Result slots**: one mutex-protected accumulator per analytic, holding
//!   the folded result table and its latency samples. Lock holders never
//!   perform I/O.

mod error;
mod pool;
mod queue;
mod slot;

pub use error::QueueClosed;
pub use pool::{DEFAULT_TASK_QUEUE_CAPACITY, WorkerPool};
pub use queue::BoundedQueue;
pub use slot::{ResultSlot, SlotState};
