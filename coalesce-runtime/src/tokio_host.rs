//! Host backed by tokio's timer and local task set.

use crate::host::{Clock, OneShotTimer, WakeFn};
use crate::timestamp::Timestamp;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Drives a coalescer from a tokio runtime.
///
/// Wakes run as local tasks, so the coalescer must be used from inside a
/// [`tokio::task::LocalSet`]. The clock follows `tokio::time`, which makes the
/// host work with a paused test runtime.
#[derive(Debug, Clone, Copy)]
pub struct TokioHost {
    epoch: Instant,
}

impl TokioHost {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }

    /// Instant that [`Timestamp::ZERO`] refers to
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

impl Default for TokioHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioHost {
    fn now(&self) -> Timestamp {
        let elapsed = self.epoch.elapsed().as_millis();
        Timestamp::from_millis(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}

impl OneShotTimer for TokioHost {
    type Handle = JoinHandle<()>;

    fn set_one_shot(&self, delay_ms: u64, on_fire: WakeFn) -> JoinHandle<()> {
        let at = Instant::now() + Duration::from_millis(delay_ms);
        tokio::task::spawn_local(async move {
            if delay_ms > 0 {
                tokio::time::sleep_until(at).await;
            }
            on_fire();
        })
    }

    fn cancel(&self, handle: JoinHandle<()>) {
        handle.abort();
    }
}
