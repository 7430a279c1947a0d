//! Change detection between successive looks at the active schedule.
//!
//! The service calls [`ActivityTracker::observe`] on a fixed tick. Each call
//! compares the merchants open now against the previous call and reports
//! arrivals, departures, and merchants about to close. The tracker only
//! reads the index it is handed.

use super::index::ScheduleIndex;
use super::model::{DayOfWeek, Span};
use super::query::{visible_by_grade, ItemLabel};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Notable items carried on an appearance alert.
const ALERT_ITEM_LIMIT: usize = 5;

/// Identifies one weekly occurrence of one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AppearanceKey {
    pub region_name: String,
    pub npc_name: String,
    pub day: DayOfWeek,
    pub start: NaiveTime,
}

impl fmt::Display for AppearanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} {}",
            self.region_name, self.npc_name, self.day, self.start
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub key: AppearanceKey,
    pub ends_at: NaiveDateTime,
    pub remaining: Span,
    /// Visible Rare-or-better items, best first.
    pub notable_items: Vec<ItemLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerchantChanges {
    pub appeared: Vec<Appearance>,
    pub ending_soon: Vec<Appearance>,
    pub departed: Vec<AppearanceKey>,
}

impl MerchantChanges {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.ending_soon.is_empty() && self.departed.is_empty()
    }
}

/// Every resolved merchant open at `now`, one entry per region and
/// occurrence.
pub fn open_appearances(index: &ScheduleIndex, now: &NaiveDateTime) -> Vec<Appearance> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for (pos, remaining) in index.open_slots(now) {
        let slot = &index.slots()[pos];
        let Some(day) = slot.day else { continue };
        for &group in &slot.groups {
            for region in index.regions_in_group(group) {
                let key = AppearanceKey {
                    region_name: region.name.clone(),
                    npc_name: region.npc_name.clone(),
                    day,
                    start: slot.start,
                };
                if !seen.insert(key.clone()) {
                    continue;
                }
                out.push(Appearance {
                    key,
                    ends_at: *now + remaining.to_duration(),
                    remaining,
                    notable_items: visible_by_grade(&region.items)
                        .into_iter()
                        .filter(|item| item.grade.is_notable())
                        .take(ALERT_ITEM_LIMIT)
                        .map(ItemLabel::from)
                        .collect(),
                });
            }
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct ActivityTracker {
    ending_soon: Span,
    active: BTreeSet<AppearanceKey>,
    warned: BTreeSet<AppearanceKey>,
}

impl ActivityTracker {
    pub fn new(ending_soon: Span) -> Self {
        Self {
            ending_soon,
            active: BTreeSet::new(),
            warned: BTreeSet::new(),
        }
    }

    /// Keys seen open at the last observation.
    pub fn active(&self) -> &BTreeSet<AppearanceKey> {
        &self.active
    }

    /// Compare merchants open at `now` with the previous observation.
    ///
    /// On the first call every open merchant counts as appeared. A merchant
    /// is reported as ending soon once per occurrence.
    pub fn observe(&mut self, index: &ScheduleIndex, now: &NaiveDateTime) -> MerchantChanges {
        let open = open_appearances(index, now);
        let current: BTreeSet<AppearanceKey> = open.iter().map(|a| a.key.clone()).collect();

        let departed: Vec<AppearanceKey> = self.active.difference(&current).cloned().collect();
        self.warned.retain(|key| current.contains(key));

        let mut changes = MerchantChanges {
            departed,
            ..MerchantChanges::default()
        };
        for appearance in open {
            if !appearance.remaining.is_zero()
                && appearance.remaining <= self.ending_soon
                && self.warned.insert(appearance.key.clone())
            {
                changes.ending_soon.push(appearance.clone());
            }
            if !self.active.contains(&appearance.key) {
                changes.appeared.push(appearance);
            }
        }

        self.active = current;
        changes
    }
}
