use std::collections::HashMap;

use crate::status::DepositView;

/// Latest displayable snapshot of every deposit, keyed by id. A live subscription pushes a
/// fresh snapshot whenever a deposit changes, so the newest one always replaces the old.
/// Only resolved views go in, so an update that cannot be displayed never evicts one that can.
#[derive(Default)]
pub struct SnapshotMap {
    views: HashMap<String, DepositView>,
}

impl SnapshotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Returns the snapshot that was replaced, if any.
    pub fn insert(&mut self, view: DepositView) -> Option<DepositView> {
        self.views.insert(view.id().to_string(), view)
    }

    /// Oldest deposit first, id breaking ties.
    pub fn into_iter_sorted(self) -> impl Iterator<Item = DepositView> {
        let mut views: Vec<_> = self.views.into_values().collect();
        views.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        views.into_iter()
    }

    // Shards are disjoint by id, so a plain extend can't drop a newer snapshot.
    pub fn merge(&mut self, other: SnapshotMap) {
        self.views.extend(other.views);
    }
}
