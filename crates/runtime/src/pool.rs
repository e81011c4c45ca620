//! Fixed-size worker pool
//!
//! Workers are tokio tasks consuming boxed futures from a shared
//! [`BoundedQueue`]. Submission order is FIFO; which worker picks a task
//! up is unspecified. Shutdown closes the task queue, lets the workers
//! drain whatever is still buffered and joins them.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::error::QueueClosed;
use crate::queue::BoundedQueue;

/// Default capacity of the shared task queue
pub const DEFAULT_TASK_QUEUE_CAPACITY: usize = 256;

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs submitted futures on a fixed number of workers
pub struct WorkerPool {
    tasks: Arc<BoundedQueue<Task>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl WorkerPool {
    /// Spawn `worker_count` workers sharing one task queue
    pub fn new(worker_count: usize) -> Self {
        Self::with_queue_capacity(worker_count, DEFAULT_TASK_QUEUE_CAPACITY)
    }

    /// Spawn workers with an explicit task queue capacity
    pub fn with_queue_capacity(worker_count: usize, queue_capacity: usize) -> Self {
        let worker_count = worker_count.max(1);
        let tasks: Arc<BoundedQueue<Task>> = Arc::new(BoundedQueue::new(queue_capacity));

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let tasks = Arc::clone(&tasks);
            workers.push(tokio::spawn(async move {
                tracing::debug!(worker_id, "pool worker starting");
                while let Ok(task) = tasks.pop().await {
                    task.await;
                }
                tracing::debug!(worker_id, "pool worker stopping");
            }));
        }

        Self {
            tasks,
            workers: Mutex::new(workers),
            worker_count,
        }
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Number of tasks waiting for a worker
    pub fn queued_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Enqueue a future for execution
    ///
    /// Waits while the task queue is full; fails once the pool has been
    /// shut down.
    pub async fn submit<F>(&self, task: F) -> Result<(), QueueClosed>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push(Box::pin(task)).await
    }

    /// Wait until every task submitted before this call has finished
    ///
    /// Implemented as a barrier task per worker slot. Useful in tests and
    /// during orderly shutdown; submitting concurrently with `flush` gives
    /// no ordering guarantee.
    pub async fn flush(&self) {
        let barrier = Arc::new(tokio::sync::Barrier::new(self.worker_count + 1));
        for _ in 0..self.worker_count {
            let barrier = Arc::clone(&barrier);
            if self
                .submit(async move {
                    barrier.wait().await;
                })
                .await
                .is_err()
            {
                return;
            }
        }
        barrier.wait().await;
    }

    /// Stop accepting tasks, drain the queue and join the workers
    pub async fn shutdown(&self) {
        self.tasks.close();
        let workers: Vec<JoinHandle<()>> = {
            let mut guard = self.workers.lock().expect("pool mutex poisoned");
            guard.drain(..).collect()
        };
        for worker in workers {
            if let Err(error) = worker.await {
                tracing::warn!(%error, "pool worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_count", &self.worker_count)
            .field("queued_tasks", &self.queued_tasks())
            .finish()
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
