//! # Coalesce - Many Delayed Callbacks, One Timer
//!
//! A drop-in replacement for "call this in N milliseconds" that keeps a single
//! host timer outstanding no matter how many callbacks are pending.
//!
//! ## Features
//!
//! - **Deadline groups**: callbacks due at the same millisecond share one group
//!   and run in the order they were scheduled
//! - **Single timer**: the host timer is re-armed only when the earliest
//!   deadline changes, and a nearer deadline always preempts a farther one
//! - **Batch drain**: everything due by the time the timer fires runs in one pass
//! - **Never synchronous**: even a zero delay runs on a later turn of the loop
//! - **Config support**: granularity and lag warnings from TOML or YAML files
//! - **Pluggable hosts**: tokio out of the box, plus a simulated host for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coalesce::{CoalescerBuilder, TokioHost};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let local = tokio::task::LocalSet::new();
//!     local
//!         .run_until(async {
//!             let timers = CoalescerBuilder::new().name("ui").build(TokioHost::new());
//!
//!             timers.schedule(|| println!("after 20ms"), 20);
//!             timers.schedule(|| println!("after 30ms"), 30);
//!             timers.schedule(|| println!("after 15ms"), 15);
//!
//!             tokio::time::sleep(std::time::Duration::from_millis(50)).await;
//!         })
//!         .await;
//! }
//! ```
//!
//! ## Testing with simulated time
//!
//! ```rust
//! use coalesce::{CoalescerBuilder, SimHost};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let host = SimHost::new();
//! let timers = CoalescerBuilder::new().build(host.clone());
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! timers.schedule(move || flag.set(true), 0);
//! assert!(!fired.get());
//!
//! host.tick(0);
//! assert!(fired.get());
//! ```
//!
//! ## Configuration
//!
//! Create `config/coalescer.toml`:
//!
//! ```toml
//! [coalescer]
//! name = "ui-timers"
//! granularity = "1ms"
//! lag_warning = "50ms"
//! ```
//!
//! Or `config/coalescer.yaml`:
//!
//! ```yaml
//! coalescer:
//!   name: ui-timers
//!   granularity: 1ms
//!   lag_warning: 50ms
//! ```
//!
//! Environment variables with the `COALESCE_` prefix override file values:
//!
//! ```bash
//! export COALESCE_COALESCER__LAG_WARNING=250ms
//! ```

// Re-export core types
pub use coalesce_runtime::{
    load_toml_config, load_yaml_config, Callback, Clock, Coalescer, CoalescerBuilder,
    CoalescerConfig, CoalescerStats, Deadline, Host, OneShotTimer, PendingGroup, Registry,
    ScheduleError, SimHost, SimTimerId, TimeUnit, Timestamp, TokioHost, WakeFn, WeakCoalescer,
};

// Host and registry modules for custom integrations
pub use coalesce_runtime::{host, registry, sim};

pub use coalesce_runtime;
