use super::error::ScheduleError;
use crate::host::{Host, WakeFn};
use crate::multiplexer::Multiplexer;
use crate::registry::{Callback, PendingGroup, Registry};
use crate::time_unit::TimeUnit;
use crate::timestamp::{Deadline, Timestamp};
use std::any::Any;
use std::cell::{Ref, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Counters describing what a coalescer has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Callbacks accepted by `schedule`
    pub scheduled: u64,
    /// Callbacks invoked
    pub fired: u64,
    /// Non-empty batches drained
    pub batches: u64,
    /// Host timers installed
    pub arms: u64,
}

pub(crate) struct Settings {
    pub(crate) name: String,
    pub(crate) granularity_ms: u64,
    pub(crate) lag_warning_ms: u64,
}

struct State<H: Host> {
    registry: Registry,
    mux: Multiplexer<H>,
    stats: CoalescerStats,
}

struct Shared<H: Host> {
    host: H,
    settings: Settings,
    state: RefCell<State<H>>,
}

/// Runs many delayed callbacks off a single host timer.
///
/// The timer is always armed for the earliest pending deadline and is only
/// replaced when that deadline changes. When it fires, every group that is due
/// by then runs in deadline order, then the timer is armed again for whatever
/// is left.
///
/// Handles are cheap to clone and share one registry. Dropping the last handle
/// cancels the outstanding timer; callbacks still pending are dropped without
/// running.
///
/// A pending callback that captures a `Coalescer` is itself a handle and keeps
/// the coalescer alive until it has run. Callbacks that reschedule themselves
/// should capture a [`WeakCoalescer`] from [`downgrade`](Self::downgrade).
pub struct Coalescer<H: Host> {
    shared: Rc<Shared<H>>,
}

impl<H: Host> Clone for Coalescer<H> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

/// Handle that does not keep its coalescer alive
pub struct WeakCoalescer<H: Host> {
    shared: Weak<Shared<H>>,
}

impl<H: Host> Clone for WeakCoalescer<H> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<H: Host> WeakCoalescer<H> {
    /// The coalescer, if any strong handle is still around
    pub fn upgrade(&self) -> Option<Coalescer<H>> {
        self.shared.upgrade().map(|shared| Coalescer { shared })
    }
}

impl<H: Host> Coalescer<H> {
    pub(crate) fn from_parts(host: H, settings: Settings) -> Self {
        Self {
            shared: Rc::new(Shared {
                host,
                settings,
                state: RefCell::new(State {
                    registry: Registry::new(),
                    mux: Multiplexer::new(),
                    stats: CoalescerStats::default(),
                }),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakCoalescer<H> {
        WeakCoalescer {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Runs `callback` no earlier than `delay_ms` milliseconds from now.
    ///
    /// Never runs it before returning, even for a zero delay.
    pub fn schedule<F>(&self, callback: F, delay_ms: u64)
    where
        F: FnOnce() + 'static,
    {
        let shared = &self.shared;
        let now = shared.host.now();
        let deadline = now
            .saturating_add(delay_ms)
            .round_up(shared.settings.granularity_ms);

        {
            let mut state = shared.state.borrow_mut();
            state.registry.insert(deadline, Box::new(callback) as Callback);
            state.stats.scheduled += 1;
        }
        trace!(coalescer = %shared.settings.name, now = %now, delay_ms, deadline = %deadline, "scheduled callback");

        Shared::rearm(shared);
    }

    /// Like [`schedule`](Self::schedule), rounding sub-millisecond parts up.
    pub fn schedule_after<F>(&self, callback: F, delay: Duration)
    where
        F: FnOnce() + 'static,
    {
        let mut delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        if delay.subsec_nanos() % 1_000_000 != 0 {
            delay_ms = delay_ms.saturating_add(1);
        }
        self.schedule(callback, delay_ms);
    }

    /// Like [`schedule`](Self::schedule) with the delay given as "250ms", "5s" or a bare millisecond count.
    pub fn schedule_in<F>(&self, callback: F, delay: &str) -> Result<(), ScheduleError>
    where
        F: FnOnce() + 'static,
    {
        let delay_ms = TimeUnit::parse_millis(delay)
            .ok_or_else(|| ScheduleError::InvalidDuration(delay.to_string()))?;
        self.schedule(callback, delay_ms);
        Ok(())
    }

    /// Number of callbacks waiting to fire
    pub fn len(&self) -> usize {
        self.shared.state.borrow().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.borrow().registry.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Deadline> {
        self.shared.state.borrow().registry.earliest_deadline()
    }

    /// Deadline the host timer is currently armed for
    pub fn armed_deadline(&self) -> Option<Deadline> {
        self.shared.state.borrow().mux.armed_deadline()
    }

    pub fn is_armed(&self) -> bool {
        self.shared.state.borrow().mux.is_armed()
    }

    pub fn stats(&self) -> CoalescerStats {
        self.shared.state.borrow().stats
    }

    pub fn name(&self) -> &str {
        &self.shared.settings.name
    }

    pub fn host(&self) -> &H {
        &self.shared.host
    }

    /// Read-only view of the pending registry
    pub fn registry(&self) -> Ref<'_, Registry> {
        Ref::map(self.shared.state.borrow(), |state| &state.registry)
    }
}

impl<H: Host> Shared<H> {
    /// Points the host timer at the earliest pending deadline, or lets it lapse.
    fn rearm(shared: &Rc<Self>) {
        let mut state = shared.state.borrow_mut();
        let Some(earliest) = state.registry.earliest_deadline() else {
            state.mux.disarm(&shared.host);
            return;
        };

        let now = shared.host.now();
        let weak: Weak<Self> = Rc::downgrade(shared);
        let armed = state.mux.arm(&shared.host, now, earliest, move |generation| -> WakeFn {
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Shared::on_wake(&shared, generation);
                }
            })
        });
        if armed {
            state.stats.arms += 1;
        }
    }

    /// One turn of the rearm loop: drain what is due, run it, arm for the rest.
    fn on_wake(shared: &Rc<Self>, generation: u64) {
        let now = shared.host.now();
        let due = {
            let mut state = shared.state.borrow_mut();
            if !state.mux.accept(generation) {
                trace!(coalescer = %shared.settings.name, generation, "ignored stale wake");
                return;
            }
            state.registry.drain_due(now)
        };

        let panicked = shared.run_batch(now, due);
        Shared::rearm(shared);

        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }
    }

    /// Invokes every drained callback, returning the first panic payload.
    ///
    /// A panicking callback does not stop the rest of the batch.
    fn run_batch(&self, now: Timestamp, due: Vec<(Deadline, PendingGroup)>) -> Option<Box<dyn Any + Send>> {
        if due.is_empty() {
            return None;
        }

        let name = &self.settings.name;
        let callbacks: usize = due.iter().map(|(_, group)| group.len()).sum();
        debug!(coalescer = %name, now = %now, groups = due.len(), callbacks, "draining due callbacks");

        let mut first_panic = None;
        for (deadline, group) in due {
            let lag_ms = deadline.millis_until(now);
            if self.settings.lag_warning_ms > 0 && lag_ms > self.settings.lag_warning_ms {
                warn!(coalescer = %name, deadline = %deadline, lag_ms, callbacks = group.len(), "callbacks fired late");
            }

            for callback in group {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
                    warn!(coalescer = %name, deadline = %deadline, "scheduled callback panicked");
                    first_panic.get_or_insert(payload);
                }
            }
        }

        let mut state = self.state.borrow_mut();
        state.stats.fired += callbacks as u64;
        state.stats.batches += 1;
        first_panic
    }
}

impl<H: Host> Drop for Shared<H> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.registry.is_empty() {
            debug!(coalescer = %self.settings.name, pending = state.registry.len(), "dropping pending callbacks");
        }
        state.mux.disarm(&self.host);
    }
}
