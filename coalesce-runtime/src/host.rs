//! Collaborators the coalescer consumes from its host environment.

use crate::timestamp::Timestamp;

/// Work handed to the host's one-shot timer, run once when the timer elapses.
pub type WakeFn = Box<dyn FnOnce()>;

/// Source of "now", consistent with the elapsed time seen by the host's timer.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The host's single-shot timer primitive.
///
/// Implementations must never run `on_fire` from inside `set_one_shot`, not even
/// for a zero delay: the wake always happens on a later turn of the host loop.
pub trait OneShotTimer {
    /// Identifies an outstanding timer so it can be canceled.
    type Handle;

    /// Runs `on_fire` once, no earlier than `delay_ms` from now.
    fn set_one_shot(&self, delay_ms: u64, on_fire: WakeFn) -> Self::Handle;

    /// Cancels an outstanding timer. Canceling one that already fired is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

/// A complete host: a clock plus a one-shot timer driven by that clock.
pub trait Host: Clock + OneShotTimer + 'static {}

impl<T: Clock + OneShotTimer + 'static> Host for T {}
