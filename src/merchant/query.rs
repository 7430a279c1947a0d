//! Read-only queries over a [`ScheduleIndex`].
//!
//! Every query is a pure function of the index (and, for the active query,
//! the supplied instant). Name matching is a case-sensitive substring test.

use super::index::ScheduleIndex;
use super::model::{DayOfWeek, Item, Region, ScheduleSlot, Span};
use super::window;
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Main items shown per merchant in the overview listing.
pub const MAIN_ITEM_LIMIT: usize = 3;
/// Catalog entries shown in a merchant's detail view.
pub const DETAIL_ITEM_LIMIT: usize = 10;

/// A region resolved from a slot's group list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MerchantLabel {
    Region { region_name: String, npc_name: String },
    /// No region carries this group id.
    Unresolved { group: i64 },
}

impl fmt::Display for MerchantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MerchantLabel::Region {
                region_name,
                npc_name,
            } => write!(f, "{} ({})", region_name, npc_name),
            MerchantLabel::Unresolved { group } => write!(f, "group {}", group),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLabel {
    pub name: String,
    pub grade: &'static str,
    pub kind: &'static str,
}

impl From<&Item> for ItemLabel {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            grade: item.grade.label(),
            kind: item.kind.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantSummary {
    pub region_name: String,
    pub npc_name: String,
    pub group: Option<i64>,
    pub item_count: usize,
    pub main_items: Vec<ItemLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlot {
    pub day: DayOfWeek,
    pub start: NaiveTime,
    pub duration: Span,
    pub merchants: Vec<MerchantLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub day: DayOfWeek,
    pub start: NaiveTime,
    pub duration: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantDetail {
    pub region_name: String,
    pub npc_name: String,
    pub group: Option<i64>,
    pub schedule: Vec<ScheduleEntry>,
    /// Visible catalog, best grade first.
    pub items: Vec<ItemLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seller {
    pub region_name: String,
    pub npc_name: String,
    pub item_name: String,
    pub grade: &'static str,
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveGroup {
    pub day: DayOfWeek,
    pub start: NaiveTime,
    pub duration: Span,
    pub ends_at: NaiveDateTime,
    pub remaining: Span,
    pub merchants: Vec<MerchantLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub merchants: usize,
    pub schedules: usize,
    /// Slot counts indexed Sunday first.
    pub per_day: [usize; 7],
}

/// Up to [`MAIN_ITEM_LIMIT`] visible items of Rare grade or better, in
/// catalog order.
pub fn main_items(items: &[Item]) -> Vec<ItemLabel> {
    items
        .iter()
        .filter(|item| item.grade.is_notable() && !item.hidden)
        .take(MAIN_ITEM_LIMIT)
        .map(ItemLabel::from)
        .collect()
}

/// Visible items sorted best grade first, ties kept in catalog order.
pub(crate) fn visible_by_grade(items: &[Item]) -> Vec<&Item> {
    let mut visible: Vec<&Item> = items.iter().filter(|item| !item.hidden).collect();
    visible.sort_by(|a, b| b.grade.rank().cmp(&a.grade.rank()));
    visible
}

fn find_region<'a>(regions: &'a [Region], query: &str) -> Option<&'a Region> {
    regions
        .iter()
        .find(|r| r.name.contains(query) || r.npc_name.contains(query))
}

impl ScheduleIndex {
    fn resolve_groups(&self, groups: &[i64]) -> Vec<MerchantLabel> {
        let mut labels = Vec::with_capacity(groups.len());
        for &group in groups {
            let before = labels.len();
            labels.extend(self.regions_in_group(group).map(|region| MerchantLabel::Region {
                region_name: region.name.clone(),
                npc_name: region.npc_name.clone(),
            }));
            if labels.len() == before {
                labels.push(MerchantLabel::Unresolved { group });
            }
        }
        labels
    }

    fn day_slot(&self, day: DayOfWeek, slot: &ScheduleSlot) -> DaySlot {
        DaySlot {
            day,
            start: slot.start,
            duration: slot.duration,
            merchants: self.resolve_groups(&slot.groups),
        }
    }

    /// One summary per region, in source order.
    pub fn merchants(&self) -> Vec<MerchantSummary> {
        self.regions()
            .iter()
            .map(|region| MerchantSummary {
                region_name: region.name.clone(),
                npc_name: region.npc_name.clone(),
                group: region.group,
                item_count: region.items.len(),
                main_items: main_items(&region.items),
            })
            .collect()
    }

    /// Every dated slot grouped by weekday. Days without slots are absent.
    pub fn schedule_by_day(&self) -> BTreeMap<DayOfWeek, Vec<DaySlot>> {
        DayOfWeek::ALL
            .into_iter()
            .map(|day| (day, self.schedule_for_day(day)))
            .filter(|(_, slots)| !slots.is_empty())
            .collect()
    }

    /// Slots on `day` in source order, not sorted by time.
    pub fn schedule_for_day(&self, day: DayOfWeek) -> Vec<DaySlot> {
        self.slots_on(day).map(|slot| self.day_slot(day, slot)).collect()
    }

    /// First region whose location or vendor name contains `query`.
    pub fn merchant_schedule(&self, query: &str) -> Option<MerchantDetail> {
        let region = find_region(self.regions(), query)?;
        let schedule = match region.group {
            Some(group) => self
                .slots()
                .iter()
                .filter(|slot| slot.groups.contains(&group))
                .filter_map(|slot| {
                    slot.day.map(|day| ScheduleEntry {
                        day,
                        start: slot.start,
                        duration: slot.duration,
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        Some(MerchantDetail {
            region_name: region.name.clone(),
            npc_name: region.npc_name.clone(),
            group: region.group,
            schedule,
            items: visible_by_grade(&region.items)
                .into_iter()
                .take(DETAIL_ITEM_LIMIT)
                .map(ItemLabel::from)
                .collect(),
        })
    }

    /// At most one seller per region: the first item whose name contains
    /// `query`.
    pub fn item_sellers(&self, query: &str) -> Vec<Seller> {
        self.regions()
            .iter()
            .filter_map(|region| {
                let item = region.items.iter().find(|item| item.name.contains(query))?;
                Some(Seller {
                    region_name: region.name.clone(),
                    npc_name: region.npc_name.clone(),
                    item_name: item.name.clone(),
                    grade: item.grade.label(),
                    kind: item.kind.label(),
                })
            })
            .collect()
    }

    /// Positions of slots open at `now`, in source order, with time left.
    pub(crate) fn open_slots(&self, now: &NaiveDateTime) -> Vec<(usize, Span)> {
        let today = DayOfWeek::of(now);
        let mut candidates: Vec<usize> = (0..=window::lookback_days(self.longest_window()))
            .flat_map(|back| self.slot_positions_on(today.days_before(back)).iter().copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates
            .into_iter()
            .filter_map(|pos| window::remaining(&self.slots()[pos], now).map(|left| (pos, left)))
            .collect()
    }

    /// Slots whose window contains `now`, including windows that opened on an
    /// earlier day and run past midnight.
    pub fn active_merchants(&self, now: &NaiveDateTime) -> Vec<ActiveGroup> {
        self.open_slots(now)
            .into_iter()
            .filter_map(|(pos, remaining)| {
                let slot = &self.slots()[pos];
                let day = slot.day?;
                Some(ActiveGroup {
                    day,
                    start: slot.start,
                    duration: slot.duration,
                    ends_at: *now + remaining.to_duration(),
                    remaining,
                    merchants: self.resolve_groups(&slot.groups),
                })
            })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let mut per_day = [0usize; 7];
        for day in DayOfWeek::ALL {
            per_day[day.index() as usize] = self.slot_positions_on(day).len();
        }
        Summary {
            merchants: self.regions().len(),
            schedules: self.slots().len(),
            per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merchant::model::{parse_clock, Grade, ItemType, DEFAULT_WINDOW};
    use chrono::NaiveDate;

    fn item(name: &str, grade: i64) -> Item {
        Item::new(name, Grade::from_code(grade), ItemType::Item)
    }

    fn slot(day: DayOfWeek, start: &str, groups: Vec<i64>) -> ScheduleSlot {
        ScheduleSlot::new(day, parse_clock(start).unwrap(), DEFAULT_WINDOW, groups)
    }

    #[test]
    fn main_items_keep_catalog_order() {
        let items = vec![item("a", 1), item("b", 4), item("c", 5), item("d", 3)];
        let names: Vec<_> = main_items(&items).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn main_items_skip_hidden_and_truncate() {
        let mut hidden = item("secret", 5);
        hidden.hidden = true;
        let items = vec![
            hidden,
            item("w", 3),
            item("x", 4),
            item("y", 3),
            item("z", 5),
        ];
        let names: Vec<_> = main_items(&items).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["w", "x", "y"]);
        assert!(main_items(&[item("odd", 8)]).is_empty());
    }

    #[test]
    fn unresolved_groups_get_placeholder() {
        let index = ScheduleIndex::build(
            vec![Region::new("Artemis", "Ben", 1)],
            vec![slot(DayOfWeek::SUNDAY, "10:00:00", vec![1, 5])],
        );
        let labels: Vec<String> = index.schedule_for_day(DayOfWeek::SUNDAY)[0]
            .merchants
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["Artemis (Ben)", "group 5"]);
    }

    #[test]
    fn detail_sorts_catalog_by_grade() {
        let index = ScheduleIndex::build(
            vec![Region::new("Artemis", "Ben", 1).with_items(vec![
                item("low", 1),
                item("top", 5),
                item("mid", 3),
                item("also-top", 5),
            ])],
            Vec::new(),
        );
        let detail = index.merchant_schedule("Art").unwrap();
        let names: Vec<_> = detail.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["top", "also-top", "mid", "low"]);
        assert!(detail.schedule.is_empty());
    }

    #[test]
    fn summary_counts_per_day() {
        let index = ScheduleIndex::build(
            vec![Region::new("Artemis", "Ben", 1)],
            vec![
                slot(DayOfWeek::SUNDAY, "10:00:00", vec![1]),
                slot(DayOfWeek::SUNDAY, "22:00:00", vec![1]),
                slot(DayOfWeek::FRIDAY, "04:00:00", vec![1]),
            ],
        );
        let summary = index.summary();
        assert_eq!(summary.merchants, 1);
        assert_eq!(summary.schedules, 3);
        assert_eq!(summary.per_day, [2, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn active_results_follow_source_order() {
        let index = ScheduleIndex::build(
            vec![Region::new("Artemis", "Ben", 1), Region::new("Yudia", "Lucas", 2)],
            vec![
                slot(DayOfWeek::MONDAY, "01:00:00", vec![1]),
                slot(DayOfWeek::SUNDAY, "22:00:00", vec![2]),
            ],
        );
        // Monday 02:00
        let now = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_time(parse_clock("02:00:00").unwrap());
        let active = index.active_merchants(&now);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].day, DayOfWeek::MONDAY);
        assert_eq!(active[1].day, DayOfWeek::SUNDAY);
        assert_eq!(active[1].remaining, Span::from_hms(1, 30, 0));
    }
}
