//! Observer seam between triggers and the rest of the system

use async_trait::async_trait;

/// Receives tick notifications from a trigger
///
/// Both methods default to no-ops so an implementor only overrides the
/// tick kind it cares about (an output sink ignores request ticks, for
/// example).
#[async_trait]
pub trait Observer: Send + Sync {
    /// A [`TimerTrigger`](crate::TimerTrigger) fired
    async fn on_time_tick(&self) {}

    /// A [`RequestTrigger`](crate::RequestTrigger) fired
    async fn on_request_tick(&self) {}
}
