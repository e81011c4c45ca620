//! Fixed-period trigger

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::TriggerError;
use crate::observer::Observer;
use crate::TriggerState;

/// Fires a time tick at a fixed period
///
/// The driver notifies once immediately on activation, then once per
/// period. Exactly one driver task exists while the trigger is active.
pub struct TimerTrigger {
    period: Duration,
    observers: Vec<Arc<dyn Observer>>,
    state: Mutex<TriggerState>,
    cancel: CancellationToken,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl TimerTrigger {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            observers: Vec::new(),
            state: Mutex::new(TriggerState::Created),
            cancel: CancellationToken::new(),
            driver: Mutex::new(None),
        }
    }

    /// Register an observer; registration order is notification order
    ///
    /// Observers register before activation.
    pub fn add_observer(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
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
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        for observer in &observers {
                            observer.on_time_tick().await;
                        }
                    }
                }
            }
            tracing::debug!("timer trigger driver stopped");
        });

        tracing::info!(
            period_ms = self.period.as_millis() as u64,
            observers = self.observers.len(),
            "timer trigger activated"
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
        tracing::info!("timer trigger deactivated");
        Ok(())
    }
}

#[cfg(test)]
#[path = "timer_test.rs"]
mod tests;
