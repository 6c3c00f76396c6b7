use std::fmt;

/// A point on the host clock, in whole milliseconds since the host's epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

/// Absolute instant a pending callback becomes due. Keys the registry.
pub type Deadline = Timestamp;

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, millis: u64) -> Self {
        Timestamp(self.0.saturating_add(millis))
    }

    /// Milliseconds from `self` until `later`, zero if `later` is not after `self`.
    pub fn millis_until(self, later: Timestamp) -> u64 {
        later.0.saturating_sub(self.0)
    }

    /// Rounds up to the next multiple of `granularity` milliseconds.
    pub(crate) fn round_up(self, granularity: u64) -> Self {
        if granularity <= 1 {
            return self;
        }
        match self.0 % granularity {
            0 => self,
            rem => self.saturating_add(granularity - rem),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
