//! Uniform-random-period trigger

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::TriggerError;
use crate::observer::Observer;
use crate::TriggerState;

/// Fires a request tick after a uniform-random sleep in `[min, max]`
///
/// Each iteration samples a fresh period, sleeps it, then notifies.
pub struct RequestTrigger {
    min_period: Duration,
    max_period: Duration,
    observers: Vec<Arc<dyn Observer>>,
    state: Mutex<TriggerState>,
    cancel: CancellationToken,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl RequestTrigger {
    /// `min` and `max` bound the sampled period, both inclusive
    pub fn new(min_period: Duration, max_period: Duration) -> Self {
        Self {
            min_period,
            max_period: max_period.max(min_period),
            observers: Vec::new(),
            state: Mutex::new(TriggerState::Created),
            cancel: CancellationToken::new(),
            driver: Mutex::new(None),
        }
    }

    /// Register an observer; registration order is notification order
    pub fn add_observer(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn state(&self) -> TriggerState {
        *self.state.lock().expect("trigger state poisoned")
    }

    /// Spawn the driver; legal only from `Created`
    pub fn activate(&self) -> Result<(), TriggerError> {
        {
            let mut state = self.state.lock().expect("trigger state poisoned");
            if *state != TriggerState::Created {
                return Err(TriggerError::InvalidState {
                    expected: TriggerState::Created,
                    actual: *state,
                });
            }
            *state = TriggerState::Active;
        }

        let observers = self.observers.clone();
        let cancel = self.cancel.clone();
        let min_ms = self.min_period.as_millis() as u64;
        let max_ms = self.max_period.as_millis() as u64;

        let handle = tokio::spawn(async move {
            loop {
                // The rng must not live across an await point
                let period = Duration::from_millis(rand::rng().random_range(min_ms..=max_ms));
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(period) => {
                        for observer in &observers {
                            observer.on_request_tick().await;
                        }
                    }
                }
            }
            tracing::debug!("request trigger driver stopped");
        });

        tracing::info!(
            min_ms,
            max_ms,
            observers = self.observers.len(),
            "request trigger activated"
        );
        *self.driver.lock().expect("trigger driver poisoned") = Some(handle);
        Ok(())
    }

    /// Cancel the driver and wait for it to stop; legal only from `Active`
    pub async fn deactivate(&self) -> Result<(), TriggerError> {
        {
            let mut state = self.state.lock().expect("trigger state poisoned");
            if *state != TriggerState::Active {
                return Err(TriggerError::InvalidState {
                    expected: TriggerState::Active,
                    actual: *state,
                });
            }
            *state = TriggerState::Stopping;
        }

        self.cancel.cancel();
        let driver = self
            .driver
            .lock()
            .expect("trigger driver poisoned")
            .take();
        if let Some(handle) = driver {
            let _ = handle.await;
        }

        *self.state.lock().expect("trigger state poisoned") = TriggerState::Stopped;
        tracing::info!("request trigger deactivated");
        Ok(())
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
