use crate::host::{OneShotTimer, WakeFn};
use crate::timestamp::{Deadline, Timestamp};
use tracing::{debug, trace};

struct Armed<H> {
    handle: H,
    deadline: Deadline,
    generation: u64,
}

/// Owns the one outstanding host timer.
///
/// Every arm gets a fresh generation; a wake is only honored if it carries the
/// generation of the timer currently outstanding.
pub(crate) struct Multiplexer<T: OneShotTimer> {
    outstanding: Option<Armed<T::Handle>>,
    generation: u64,
}

impl<T: OneShotTimer> Multiplexer<T> {
    pub(crate) fn new() -> Self {
        Self {
            outstanding: None,
            generation: 0,
        }
    }

    /// Ensures exactly one wake is pending, at or after `deadline`.
    ///
    /// `wake` builds the host callback for the given generation. Returns `false`
    /// when a timer for the same deadline is already outstanding and nothing changed.
    pub(crate) fn arm<F>(&mut self, timer: &T, now: Timestamp, deadline: Deadline, wake: F) -> bool
    where
        F: FnOnce(u64) -> WakeFn,
    {
        if self.armed_deadline() == Some(deadline) {
            return false;
        }
        self.disarm(timer);

        self.generation += 1;
        let wait_ms = now.millis_until(deadline);
        let handle = timer.set_one_shot(wait_ms, wake(self.generation));
        debug!(deadline = %deadline, wait_ms, generation = self.generation, "armed wake timer");

        self.outstanding = Some(Armed {
            handle,
            deadline,
            generation: self.generation,
        });
        true
    }

    /// Cancels the outstanding timer, if any.
    pub(crate) fn disarm(&mut self, timer: &T) {
        if let Some(armed) = self.outstanding.take() {
            trace!(deadline = %armed.deadline, generation = armed.generation, "disarmed wake timer");
            timer.cancel(armed.handle);
        }
    }

    /// Claims a wake from the host. Stale generations are rejected.
    pub(crate) fn accept(&mut self, generation: u64) -> bool {
        match &self.outstanding {
            Some(armed) if armed.generation == generation => {
                self.outstanding = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn armed_deadline(&self) -> Option<Deadline> {
        self.outstanding.as_ref().map(|armed| armed.deadline)
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.outstanding.is_some()
    }
}
