//! The refresh cycle: load a snapshot, build an index, publish it.
//!
//! A failed load never clears the store. The index served before the attempt
//! stays current and the failure is counted in [`RefreshStatus`].

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;

use super::{SnapshotSource, SourceError};
use crate::merchant::{IndexStats, IndexStore, ScheduleIndex};

/// Bookkeeping about past refresh attempts.
#[derive(Debug, Clone, Default)]
pub struct RefreshStatus {
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    /// A new index was built and is now being served.
    Updated(IndexStats),
    /// Loading failed; the index served before the attempt is still current.
    KeptPrevious(SourceError),
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated(_))
    }
}

/// Loads snapshots from one source and publishes them to a store.
pub struct Refresher {
    source: SnapshotSource,
    store: Arc<IndexStore>,
    status: RefreshStatus,
}

impl Refresher {
    pub fn new(source: SnapshotSource, store: Arc<IndexStore>) -> Self {
        Self {
            source,
            store,
            status: RefreshStatus::default(),
        }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn source(&self) -> &SnapshotSource {
        &self.source
    }

    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    /// Load one snapshot and, if it decodes, replace the served index.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        self.status.last_attempt = Some(Utc::now());
        match self.source.load().await {
            Ok(snapshot) => {
                let index = ScheduleIndex::from_snapshot(snapshot);
                let stats = index.stats();
                self.store.publish(index);

                self.status.last_success = self.status.last_attempt;
                self.status.consecutive_failures = 0;
                self.status.last_error = None;

                info!(
                    "Merchant snapshot loaded from {}: {} regions, {} slots, {} groups",
                    self.source, stats.regions, stats.slots, stats.groups
                );
                if stats.undated_slots > 0 {
                    warn!(
                        "{} schedule slots carry no valid day and are ignored",
                        stats.undated_slots
                    );
                }
                if stats.unresolved_groups > 0 {
                    warn!(
                        "{} group ids in the schedule match no region",
                        stats.unresolved_groups
                    );
                }
                RefreshOutcome::Updated(stats)
            }
            Err(e) => {
                self.status.consecutive_failures += 1;
                self.status.last_error = Some(e.to_string());
                let served = self.store.current();
                warn!(
                    "Merchant snapshot refresh from {} failed ({} in a row): {}; still serving {} regions",
                    self.source,
                    self.status.consecutive_failures,
                    e,
                    served.regions().len()
                );
                RefreshOutcome::KeptPrevious(e)
            }
        }
    }
}
