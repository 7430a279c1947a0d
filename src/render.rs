//! Compact plain-text rendering of query results for the CLI and logs.
//!
//! One record per line, no decoration beyond a header, so output stays
//! readable in a terminal and greppable in a log file.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::merchant::{
    ActiveGroup, Appearance, DayOfWeek, DaySlot, ItemLabel, MerchantChanges, MerchantDetail,
    MerchantLabel, MerchantSummary, Seller, Span, Summary,
};

fn join_labels(labels: &[MerchantLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_items(items: &[ItemLabel]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(|item| format!("{} ({})", item.name, item.grade))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `1h 05m` / `12m`, the way remaining time is shown to players.
pub fn remaining(span: Span) -> String {
    let minutes = span.as_secs() / 60;
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

pub fn merchants(list: &[MerchantSummary]) -> String {
    if list.is_empty() {
        return "No merchant data loaded.".to_string();
    }
    let mut out = format!("Merchants ({})\n", list.len());
    for m in list {
        let _ = writeln!(
            out,
            "- {}: {} | {} items | main: {}",
            m.region_name,
            m.npc_name,
            m.item_count,
            join_items(&m.main_items)
        );
    }
    out
}

pub fn day_schedule(day: DayOfWeek, slots: &[DaySlot]) -> String {
    if slots.is_empty() {
        return format!("No merchants scheduled on {}.", day);
    }
    let mut out = format!("{} schedule\n", day);
    for slot in slots {
        let _ = writeln!(
            out,
            "- {} ({}): {}",
            slot.start,
            slot.duration,
            join_labels(&slot.merchants)
        );
    }
    out
}

pub fn week_schedule(week: &BTreeMap<DayOfWeek, Vec<DaySlot>>) -> String {
    if week.is_empty() {
        return "No merchants scheduled.".to_string();
    }
    week.iter()
        .map(|(day, slots)| day_schedule(*day, slots))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn merchant_detail(query: &str, detail: Option<&MerchantDetail>) -> String {
    let Some(detail) = detail else {
        return format!("No merchant matching \"{}\".", query);
    };
    let mut out = format!("{} ({})\n", detail.npc_name, detail.region_name);
    out.push_str("Schedule:\n");
    if detail.schedule.is_empty() {
        out.push_str("  none\n");
    }
    for entry in &detail.schedule {
        let _ = writeln!(out, "  {} {} ({})", entry.day, entry.start, entry.duration);
    }
    out.push_str("Items:\n");
    if detail.items.is_empty() {
        out.push_str("  none\n");
    }
    for item in &detail.items {
        let _ = writeln!(out, "  {} {} [{}]", item.grade, item.name, item.kind);
    }
    out
}

pub fn sellers(query: &str, sellers: &[Seller]) -> String {
    if sellers.is_empty() {
        return format!("No merchant sells \"{}\".", query);
    }
    let mut out = format!("Sellers of \"{}\"\n", query);
    for s in sellers {
        let _ = writeln!(
            out,
            "- {} - {}: {} ({} {})",
            s.region_name, s.npc_name, s.item_name, s.grade, s.kind
        );
    }
    out
}

pub fn active(now: &NaiveDateTime, groups: &[ActiveGroup]) -> String {
    let stamp = now.format("%a %H:%M:%S");
    if groups.is_empty() {
        return format!("No merchants active at {}.", stamp);
    }
    let mut out = format!("Active at {}\n", stamp);
    for g in groups {
        let _ = writeln!(
            out,
            "- {} {} ({}), closes {} ({} left): {}",
            g.day,
            g.start,
            g.duration,
            g.ends_at.format("%H:%M:%S"),
            remaining(g.remaining),
            join_labels(&g.merchants)
        );
    }
    out
}

pub fn summary(s: &Summary) -> String {
    let mut out = format!("{} merchants, {} schedule slots\n", s.merchants, s.schedules);
    for day in DayOfWeek::ALL {
        let _ = writeln!(out, "  {:<9} {}", day.name(), s.per_day[day.index() as usize]);
    }
    out
}

fn appearance(a: &Appearance) -> String {
    format!(
        "{} - {} until {}",
        a.key.region_name,
        a.key.npc_name,
        a.ends_at.format("%H:%M:%S")
    )
}

/// One line per change, for the watch service log.
pub fn changes(c: &MerchantChanges) -> Vec<String> {
    let mut lines = Vec::new();
    for a in &c.appeared {
        lines.push(format!(
            "Merchant appeared: {} | notable: {}",
            appearance(a),
            join_items(&a.notable_items)
        ));
    }
    for a in &c.ending_soon {
        lines.push(format!(
            "Merchant closing in {}: {}",
            remaining(a.remaining),
            appearance(a)
        ));
    }
    for key in &c.departed {
        lines.push(format!("Merchant departed: {}", key));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_formats() {
        assert_eq!(remaining(Span::from_hms(1, 5, 59)), "1h 05m");
        assert_eq!(remaining(Span::from_hms(0, 12, 0)), "12m");
        assert_eq!(remaining(Span::ZERO), "0m");
    }

    #[test]
    fn empty_results_have_messages() {
        assert_eq!(merchants(&[]), "No merchant data loaded.");
        assert_eq!(
            day_schedule(DayOfWeek::FRIDAY, &[]),
            "No merchants scheduled on Friday."
        );
        assert_eq!(merchant_detail("Ben", None), "No merchant matching \"Ben\".");
        assert_eq!(sellers("box", &[]), "No merchant sells \"box\".");
        assert!(changes(&MerchantChanges::default()).is_empty());
    }

    #[test]
    fn day_schedule_lines() {
        let slots = vec![DaySlot {
            day: DayOfWeek::SUNDAY,
            start: chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            duration: Span::from_hms(5, 30, 0),
            merchants: vec![
                MerchantLabel::Region {
                    region_name: "Yudia".to_string(),
                    npc_name: "Lucas".to_string(),
                },
                MerchantLabel::Unresolved { group: 9 },
            ],
        }];
        assert_eq!(
            day_schedule(DayOfWeek::SUNDAY, &slots),
            "Sunday schedule\n- 22:00:00 (05:30:00): Yudia (Lucas), group 9\n"
        );
    }
}
