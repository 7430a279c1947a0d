//! The schedule index: one immutable build per snapshot.
//!
//! [`ScheduleIndex::build`] makes two grouping passes, regions by `group` and
//! slots by day. Both partitions store positions into the owned record
//! vectors, so every view keeps the source order.

use super::model::{DayOfWeek, Region, ScheduleSlot, Snapshot, Span};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct ScheduleIndex {
    regions: Vec<Region>,
    slots: Vec<ScheduleSlot>,
    by_group: HashMap<i64, Vec<usize>>,
    by_day: [Vec<usize>; 7],
    longest_window: Span,
}

/// Counts logged after each refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    pub regions: usize,
    pub slots: usize,
    pub groups: usize,
    /// Slots whose day was missing or out of range.
    pub undated_slots: usize,
    /// Distinct group ids referenced by slots that no region carries.
    pub unresolved_groups: usize,
}

impl ScheduleIndex {
    pub fn build(regions: Vec<Region>, slots: Vec<ScheduleSlot>) -> Self {
        let mut by_group: HashMap<i64, Vec<usize>> = HashMap::with_capacity(regions.len());
        for (pos, region) in regions.iter().enumerate() {
            if let Some(group) = region.group {
                by_group.entry(group).or_default().push(pos);
            }
        }

        let mut by_day: [Vec<usize>; 7] = Default::default();
        let mut longest_window = Span::ZERO;
        for (pos, slot) in slots.iter().enumerate() {
            if let Some(day) = slot.day {
                by_day[day.index() as usize].push(pos);
                longest_window = longest_window.max(slot.duration);
            }
        }

        Self {
            regions,
            slots,
            by_group,
            by_day,
            longest_window,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::build(snapshot.regions, snapshot.schedules)
    }

    /// Index over no data; every query answers empty or not-found.
    pub fn empty() -> Self {
        Self::build(Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.slots.is_empty()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn slots(&self) -> &[ScheduleSlot] {
        &self.slots
    }

    /// Every region sharing `group`, in source order.
    pub fn regions_in_group(&self, group: i64) -> impl Iterator<Item = &Region> + '_ {
        self.by_group
            .get(&group)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&pos| &self.regions[pos])
    }

    pub fn slots_on(&self, day: DayOfWeek) -> impl Iterator<Item = &ScheduleSlot> + '_ {
        self.slot_positions_on(day)
            .iter()
            .map(move |&pos| &self.slots[pos])
    }

    pub(crate) fn slot_positions_on(&self, day: DayOfWeek) -> &[usize] {
        &self.by_day[day.index() as usize]
    }

    pub(crate) fn longest_window(&self) -> Span {
        self.longest_window
    }

    pub fn stats(&self) -> IndexStats {
        let referenced: HashSet<i64> = self
            .slots
            .iter()
            .flat_map(|slot| slot.groups.iter().copied())
            .collect();
        IndexStats {
            regions: self.regions.len(),
            slots: self.slots.len(),
            groups: self.by_group.len(),
            undated_slots: self.slots.iter().filter(|s| s.day.is_none()).count(),
            unresolved_groups: referenced
                .iter()
                .filter(|&group| !self.by_group.contains_key(group))
                .count(),
        }
    }
}

impl Default for ScheduleIndex {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merchant::model::{parse_clock, DEFAULT_WINDOW};

    fn slot(day: DayOfWeek, start: &str, groups: Vec<i64>) -> ScheduleSlot {
        ScheduleSlot::new(day, parse_clock(start).unwrap(), DEFAULT_WINDOW, groups)
    }

    #[test]
    fn shared_groups_resolve_to_every_region() {
        let index = ScheduleIndex::build(
            vec![
                Region::new("Artemis", "Ben", 1),
                Region::new("Yudia", "Lucas", 2),
                Region::new("Arthetine", "Morris", 1),
            ],
            Vec::new(),
        );
        let names: Vec<_> = index.regions_in_group(1).map(|r| r.npc_name.as_str()).collect();
        assert_eq!(names, vec!["Ben", "Morris"]);
        assert_eq!(index.regions_in_group(42).count(), 0);
    }

    #[test]
    fn slots_partition_by_day_in_source_order() {
        let index = ScheduleIndex::build(
            Vec::new(),
            vec![
                slot(DayOfWeek::SUNDAY, "22:00:00", vec![2]),
                slot(DayOfWeek::MONDAY, "04:00:00", vec![1]),
                slot(DayOfWeek::SUNDAY, "10:00:00", vec![1]),
            ],
        );
        let sunday: Vec<_> = index
            .slots_on(DayOfWeek::SUNDAY)
            .map(|s| s.start.to_string())
            .collect();
        assert_eq!(sunday, vec!["22:00:00", "10:00:00"]);
        assert_eq!(index.slots_on(DayOfWeek::MONDAY).count(), 1);
        assert_eq!(index.slots_on(DayOfWeek::FRIDAY).count(), 0);
    }

    #[test]
    fn stats_count_undated_and_unresolved() {
        let mut undated = slot(DayOfWeek::MONDAY, "10:00:00", vec![9]);
        undated.day = None;
        let index = ScheduleIndex::build(
            vec![Region::new("Artemis", "Ben", 1)],
            vec![slot(DayOfWeek::SUNDAY, "10:00:00", vec![1, 7]), undated],
        );
        let stats = index.stats();
        assert_eq!(stats.regions, 1);
        assert_eq!(stats.slots, 2);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.undated_slots, 1);
        assert_eq!(stats.unresolved_groups, 2);
    }

    #[test]
    fn empty_index_is_constructible() {
        let index = ScheduleIndex::empty();
        assert!(index.is_empty());
        assert_eq!(index.stats(), IndexStats::default());
    }
}
