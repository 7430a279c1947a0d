//! Holder for the index currently being served.
//!
//! The lock guards a single `Arc`. Readers clone it and query without holding
//! the lock; a refresh builds its index elsewhere and swaps the reference in
//! one assignment, so no reader can see a half-built index.

use super::index::ScheduleIndex;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
pub struct IndexStore {
    current: RwLock<Arc<ScheduleIndex>>,
}

impl IndexStore {
    /// Starts out serving the empty index.
    pub fn new() -> Self {
        Self::with_index(ScheduleIndex::empty())
    }

    pub fn with_index(index: ScheduleIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    pub fn current(&self) -> Arc<ScheduleIndex> {
        // A poisoned lock still holds a complete Arc.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the served index, returning the one it supersedes.
    pub fn publish(&self, index: ScheduleIndex) -> Arc<ScheduleIndex> {
        let next = Arc::new(index);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merchant::model::Region;

    #[test]
    fn readers_keep_their_snapshot_across_publish() {
        let store = IndexStore::new();
        let before = store.current();
        assert!(before.is_empty());

        let old = store.publish(ScheduleIndex::build(
            vec![Region::new("Artemis", "Ben", 1)],
            Vec::new(),
        ));
        assert!(old.is_empty());
        assert!(before.is_empty());
        assert_eq!(store.current().regions().len(), 1);
    }

    #[test]
    fn concurrent_readers_see_whole_indexes() {
        let store = Arc::new(IndexStore::new());
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for n in 1..=50usize {
                    let regions = (0..n)
                        .map(|i| Region::new(format!("r{i}"), format!("npc{i}"), i as i64))
                        .collect();
                    store.publish(ScheduleIndex::build(regions, Vec::new()));
                }
            })
        };
        for _ in 0..200 {
            let index = store.current();
            let stats = index.stats();
            assert_eq!(stats.regions, stats.groups);
            assert_eq!(index.merchants().len(), stats.regions);
        }
        writer.join().unwrap();
        assert_eq!(store.current().regions().len(), 50);
    }
}
