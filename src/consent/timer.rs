//! Expiry timers
//!
//! One delayed callback per pending member. Cancellation is best-effort:
//! once the delay has elapsed the callback is detached onto its own task and
//! can no longer be stopped, so callbacks must re-check the registry before
//! acting.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::AbortHandle;

/// Callback run when a timer fires; receives the id of the timer that fired.
pub type TimerCallback = Box<dyn FnOnce(TimerId) -> BoxFuture<'static, ()> + Send>;

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Cancelable handle to a scheduled timer
#[derive(Clone)]
pub struct TimerHandle {
    id: TimerId,
    task: AbortHandle,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Stop the timer if it has not fired yet. No-op otherwise.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("id", &self.id).finish()
    }
}

/// Schedules delayed, cancelable callbacks
pub trait TimerService: Send + Sync + 'static {
    /// Run `callback` once after `after` unless canceled first
    fn schedule(&self, after: Duration, callback: TimerCallback) -> TimerHandle;

    /// Best-effort cancellation
    fn cancel(&self, handle: &TimerHandle) {
        handle.cancel();
    }
}

/// Timer service backed by tokio tasks.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct TokioTimerService {
    next_id: AtomicU64,
}

impl TokioTimerService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerService for TokioTimerService {
    fn schedule(&self, after: Duration, callback: TimerCallback) -> TimerHandle {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Detached: aborting the sleeper must not cut a running callback short
            tokio::spawn(callback(id));
        });

        TimerHandle {
            id,
            task: task.abort_handle(),
        }
    }
}
