//! Long-running refresh and alert loop behind `merchant-board watch`.
//!
//! The service refreshes the snapshot on one interval and looks for merchant
//! changes on a faster one. Both run on the current task; queries against the
//! shared [`IndexStore`] can be served from elsewhere at the same time.

use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, info};
use std::sync::Arc;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::config::Config;
use crate::merchant::{ActivityTracker, IndexStore, MerchantChanges};
use crate::render;
use crate::source::{Refresher, SnapshotSource};

pub struct MerchantService {
    config: Config,
    refresher: Refresher,
    tracker: ActivityTracker,
}

impl MerchantService {
    pub fn new(config: Config, source: SnapshotSource) -> Self {
        let store = Arc::new(IndexStore::new());
        let tracker = ActivityTracker::new(config.tracker.ending_soon());
        Self {
            refresher: Refresher::new(source, store),
            tracker,
            config,
        }
    }

    /// Shared handle to the index being served.
    pub fn store(&self) -> Arc<IndexStore> {
        Arc::clone(self.refresher.store())
    }

    pub fn refresher_mut(&mut self) -> &mut Refresher {
        &mut self.refresher
    }

    /// Compare the merchants open now with the previous check and log the
    /// differences.
    pub fn check_changes(&mut self) -> MerchantChanges {
        let now = self.config.clock.now();
        self.check_changes_at(&now)
    }

    /// Same as [`check_changes`](Self::check_changes) at a given reference
    /// clock time.
    pub fn check_changes_at(&mut self, now: &NaiveDateTime) -> MerchantChanges {
        let index = self.refresher.store().current();
        let changes = self.tracker.observe(&index, now);
        if changes.is_empty() {
            debug!("No merchant changes at {}", now.format("%a %H:%M:%S"));
        }
        for line in render::changes(&changes) {
            info!("{}", line);
        }
        changes
    }

    /// Run until ctrl-c.
    pub async fn run(&mut self) -> Result<()> {
        let refresh_every = self.config.source.refresh_interval();
        info!(
            "Merchant watch started: source {}, refresh every {}s, reference clock UTC{}",
            self.refresher.source(),
            refresh_every.as_secs(),
            self.config.clock.offset()
        );

        self.refresher.refresh().await;

        let mut refresh = interval_at(Instant::now() + refresh_every, refresh_every);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut check = interval(self.config.tracker.check_interval());
        check.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let tracking = self.config.tracker.enabled;

        loop {
            tokio::select! {
                _ = refresh.tick() => {
                    self.refresher.refresh().await;
                }
                _ = check.tick(), if tracking => {
                    self.check_changes();
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping merchant watch");
                    break;
                }
            }
        }
        Ok(())
    }
}
