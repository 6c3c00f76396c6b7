mod builder;
mod coalescer;
mod error;

pub use builder::CoalescerBuilder;
pub use coalescer::{Coalescer, CoalescerStats, WeakCoalescer};
pub use error::ScheduleError;
