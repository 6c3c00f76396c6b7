use crate::timestamp::{Deadline, Timestamp};
use std::collections::BTreeMap;

/// A zero-argument callback waiting for its deadline.
pub type Callback = Box<dyn FnOnce()>;

/// Callbacks sharing one deadline, in the order they were scheduled.
pub type PendingGroup = Vec<Callback>;

/// Pending callbacks keyed by absolute deadline.
///
/// A deadline is present only while at least one callback is still pending for it.
#[derive(Default)]
pub struct Registry {
    groups: BTreeMap<Deadline, PendingGroup>,
    len: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `callback` to the group at `deadline`, creating the group if needed.
    pub fn insert(&mut self, deadline: Deadline, callback: Callback) {
        self.groups.entry(deadline).or_default().push(callback);
        self.len += 1;
    }

    /// The smallest deadline still pending, looked up fresh on every call.
    pub fn earliest_deadline(&self) -> Option<Deadline> {
        self.groups.keys().next().copied()
    }

    /// Removes every group due at or before `now`, in increasing deadline order.
    pub fn drain_due(&mut self, now: Timestamp) -> Vec<(Deadline, PendingGroup)> {
        let due = match now.as_millis().checked_add(1) {
            Some(after) => {
                let later = self.groups.split_off(&Timestamp::from_millis(after));
                std::mem::replace(&mut self.groups, later)
            }
            None => std::mem::take(&mut self.groups),
        };

        let drained: Vec<(Deadline, PendingGroup)> = due.into_iter().collect();
        self.len -= drained.iter().map(|(_, group)| group.len()).sum::<usize>();
        drained
    }

    /// Number of pending callbacks across all deadlines.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct pending deadlines.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.groups.iter().map(|(deadline, group)| (deadline, group.len())))
            .finish()
    }
}
