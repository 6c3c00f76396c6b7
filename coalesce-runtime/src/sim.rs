//! Deterministic host with a virtual millisecond clock.
//!
//! Time only moves when [`SimHost::tick`] is called. Timers due within the
//! ticked span fire in due order, and a timer armed while ticking fires in the
//! same call if it lands inside the span. `tick(0)` runs whatever is due now,
//! which is how zero-delay work is flushed.

use crate::host::{Clock, OneShotTimer, WakeFn};
use crate::timestamp::Timestamp;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle to a timer armed on a [`SimHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTimerId {
    due: Timestamp,
    seq: u64,
}

impl SimTimerId {
    pub fn due(&self) -> Timestamp {
        self.due
    }
}

#[derive(Default)]
struct SimState {
    now: Timestamp,
    next_seq: u64,
    timers: BTreeMap<SimTimerId, WakeFn>,
}

/// Simulated host. Clones share the same clock and timer queue.
#[derive(Clone, Default)]
pub struct SimHost {
    inner: Rc<RefCell<SimState>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `ms`, firing every timer that comes due on the way.
    ///
    /// A panic raised by a fired timer propagates out of `tick`; the clock stays
    /// at that timer's due time and the remaining timers stay queued.
    pub fn tick(&self, ms: u64) {
        let target = self.now().saturating_add(ms);
        while let Some(on_fire) = self.pop_due(target) {
            on_fire();
        }
        self.inner.borrow_mut().now = target;
    }

    /// Advances the clock to `at`. Does nothing if `at` is in the past.
    pub fn tick_to(&self, at: Timestamp) {
        let ms = self.now().millis_until(at);
        self.tick(ms);
    }

    /// Number of armed timers that have not fired or been canceled.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Due time of the next armed timer.
    pub fn next_timer(&self) -> Option<Timestamp> {
        self.inner.borrow().timers.keys().next().map(SimTimerId::due)
    }

    fn pop_due(&self, target: Timestamp) -> Option<WakeFn> {
        let mut state = self.inner.borrow_mut();
        let id = *state.timers.keys().next()?;
        if id.due > target {
            return None;
        }
        state.now = state.now.max(id.due);
        state.timers.remove(&id)
    }
}

impl Clock for SimHost {
    fn now(&self) -> Timestamp {
        self.inner.borrow().now
    }
}

impl OneShotTimer for SimHost {
    type Handle = SimTimerId;

    fn set_one_shot(&self, delay_ms: u64, on_fire: WakeFn) -> SimTimerId {
        let mut state = self.inner.borrow_mut();
        let id = SimTimerId {
            due: state.now.saturating_add(delay_ms),
            seq: state.next_seq,
        };
        state.next_seq += 1;
        state.timers.insert(id, on_fire);
        id
    }

    fn cancel(&self, handle: SimTimerId) {
        self.inner.borrow_mut().timers.remove(&handle);
    }
}
