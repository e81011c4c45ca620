//! Bounded producer/consumer queue
//!
//! A fixed-capacity FIFO guarded by a pair of counting semaphores:
//! `empty_slots` starts at the capacity and gates producers, `full_slots`
//! starts at zero and gates consumers. Closing the queue closes both
//! semaphores, which wakes every waiter.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::Semaphore;

use crate::error::QueueClosed;

/// Fixed-capacity MPMC channel with counting-semaphore semantics
///
/// `push` blocks while the queue is full, `pop` blocks while it is empty.
/// After [`BoundedQueue::close`], `push` fails immediately and `pop` drains
/// whatever is still buffered before failing. Within one queue, items are
/// delivered in push order.
pub struct BoundedQueue<T> {
    capacity: usize,
    empty_slots: Semaphore,
    full_slots: Semaphore,
    buffer: Mutex<VecDeque<T>>,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items
    ///
    /// A zero capacity is bumped to one; a rendezvous queue cannot make
    /// progress with the drain-style consumers used by the pipeline.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            empty_slots: Semaphore::new(capacity),
            full_slots: Semaphore::new(0),
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-blocking snapshot of the buffered item count
    pub fn len(&self) -> usize {
        self.buffer.lock().expect("queue mutex poisoned").len()
    }

    /// Non-blocking emptiness snapshot, used by drain loops
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().expect("queue mutex poisoned").is_empty()
    }

    /// Append an item, waiting while the queue is full
    pub async fn push(&self, item: T) -> Result<(), QueueClosed> {
        let permit = self.empty_slots.acquire().await.map_err(|_| QueueClosed)?;
        permit.forget();
        self.buffer
            .lock()
            .expect("queue mutex poisoned")
            .push_back(item);
        self.full_slots.add_permits(1);
        Ok(())
    }

    /// Remove the oldest item, waiting while the queue is empty
    ///
    /// After close, remaining items are still handed out; only then does
    /// the sentinel appear.
    pub async fn pop(&self) -> Result<T, QueueClosed> {
        match self.full_slots.acquire().await {
            Ok(permit) => {
                permit.forget();
                let item = self
                    .buffer
                    .lock()
                    .expect("queue mutex poisoned")
                    .pop_front()
                    .expect("full permit held without a buffered item");
                self.empty_slots.add_permits(1);
                Ok(item)
            }
            // Closed: drain leftovers before reporting the sentinel
            Err(_) => self
                .buffer
                .lock()
                .expect("queue mutex poisoned")
                .pop_front()
                .ok_or(QueueClosed),
        }
    }

    /// Close the queue, waking all blocked producers and consumers
    pub fn close(&self) {
        self.empty_slots.close();
        self.full_slots.close();
    }

    /// Whether [`BoundedQueue::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.empty_slots.is_closed()
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod tests;
