//! Coalesce Runtime - Core runtime for timer coalescing
//!
//! Many delayed callbacks, one host timer. Callbacks are grouped by absolute
//! deadline and the single underlying timer is re-armed only when the earliest
//! deadline changes.

mod coalescer;
mod config;
mod multiplexer;
mod timestamp;
mod time_unit;
pub mod host;
pub mod registry;
pub mod sim;
pub mod tokio_host;

// Re-export public API
pub use coalescer::{Coalescer, CoalescerBuilder, CoalescerStats, ScheduleError, WeakCoalescer};
pub use config::{load_toml_config, load_yaml_config, CoalescerConfig, CONFIG_SECTION};
pub use host::{Clock, Host, OneShotTimer, WakeFn};
pub use registry::{Callback, PendingGroup, Registry};
pub use sim::{SimHost, SimTimerId};
pub use time_unit::TimeUnit;
pub use timestamp::{Deadline, Timestamp};
pub use tokio_host::TokioHost;
