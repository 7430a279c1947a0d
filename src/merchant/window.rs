//! Weekly window arithmetic for schedule slots.
//!
//! A slot occupies the half-open range `[start, start + duration)` on a
//! repeating seven-day clock. Positions are measured in seconds from Sunday
//! 00:00, so a window that runs past midnight (or past Saturday night) stays
//! active into the following day without special cases.

use super::model::{DayOfWeek, ScheduleSlot, Span};
use chrono::{NaiveDateTime, NaiveTime, Timelike};

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

fn week_position(day: DayOfWeek, time: NaiveTime) -> i64 {
    i64::from(day.index()) * SECS_PER_DAY + i64::from(time.num_seconds_from_midnight())
}

/// Time since the current occurrence of `slot` opened, or `None` when `now`
/// is outside every occurrence.
///
/// Zero-length slots are never open. Slots lasting a week or more are
/// always open.
pub fn elapsed(slot: &ScheduleSlot, now: &NaiveDateTime) -> Option<Span> {
    let day = slot.day?;
    let length = i64::from(slot.duration.as_secs());
    if length == 0 {
        return None;
    }
    let now_pos = week_position(DayOfWeek::of(now), now.time());
    let since_start = (now_pos - week_position(day, slot.start)).rem_euclid(SECS_PER_WEEK);
    if length >= SECS_PER_WEEK || since_start < length {
        Some(Span::from_secs(since_start as u32))
    } else {
        None
    }
}

pub fn is_active(slot: &ScheduleSlot, now: &NaiveDateTime) -> bool {
    elapsed(slot, now).is_some()
}

/// Time left in the occurrence containing `now`.
pub fn remaining(slot: &ScheduleSlot, now: &NaiveDateTime) -> Option<Span> {
    let elapsed = elapsed(slot, now)?;
    Some(Span::from_secs(slot.duration.as_secs() - elapsed.as_secs()))
}

/// Wall-clock instant at which the occurrence containing `now` closes.
pub fn ends_at(slot: &ScheduleSlot, now: &NaiveDateTime) -> Option<NaiveDateTime> {
    remaining(slot, now).map(|left| *now + left.to_duration())
}

/// How many earlier days can hold a slot that is still open today.
pub(crate) fn lookback_days(longest: Span) -> u32 {
    let secs = i64::from(longest.as_secs());
    let days = (secs + SECS_PER_DAY - 1) / SECS_PER_DAY;
    days.min(6) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merchant::model::parse_clock;
    use chrono::NaiveDate;

    // 2024-06-02 is a Sunday.
    fn at(day: u32, time: &str) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_time(parse_clock(time).unwrap())
    }

    fn late_sunday() -> ScheduleSlot {
        ScheduleSlot::new(
            DayOfWeek::SUNDAY,
            parse_clock("22:00:00").unwrap(),
            Span::from_hms(5, 30, 0),
            vec![2],
        )
    }

    #[test]
    fn window_wraps_past_midnight() {
        let slot = late_sunday();
        assert!(is_active(&slot, &at(2, "23:00:00")));
        assert!(is_active(&slot, &at(3, "02:00:00")));
        assert!(!is_active(&slot, &at(3, "04:00:00")));
        assert!(!is_active(&slot, &at(2, "21:59:59")));
    }

    #[test]
    fn window_is_half_open() {
        let slot = late_sunday();
        assert!(is_active(&slot, &at(2, "22:00:00")));
        assert!(is_active(&slot, &at(3, "03:29:59")));
        assert!(!is_active(&slot, &at(3, "03:30:00")));
    }

    #[test]
    fn saturday_night_runs_into_sunday() {
        let slot = ScheduleSlot::new(
            DayOfWeek::SATURDAY,
            parse_clock("23:00:00").unwrap(),
            Span::from_hms(2, 0, 0),
            vec![1],
        );
        // 2024-06-09 is the following Sunday.
        assert!(is_active(&slot, &at(9, "00:30:00")));
        assert!(!is_active(&slot, &at(9, "01:00:00")));
    }

    #[test]
    fn other_days_are_inactive() {
        let slot = late_sunday();
        assert!(!is_active(&slot, &at(4, "23:00:00")));
    }

    #[test]
    fn remaining_and_end_time() {
        let slot = late_sunday();
        let now = at(3, "02:00:00");
        assert_eq!(remaining(&slot, &now), Some(Span::from_hms(1, 30, 0)));
        assert_eq!(ends_at(&slot, &now), Some(at(3, "03:30:00")));
        assert_eq!(ends_at(&slot, &at(3, "05:00:00")), None);
    }

    #[test]
    fn degenerate_lengths() {
        let mut slot = late_sunday();
        slot.duration = Span::ZERO;
        assert!(!is_active(&slot, &at(2, "22:00:00")));
        slot.duration = Span::from_hms(7 * 24, 0, 0);
        assert!(is_active(&slot, &at(5, "12:00:00")));
        slot.day = None;
        assert!(!is_active(&slot, &at(2, "22:30:00")));
    }

    #[test]
    fn lookback_covers_longest_window() {
        assert_eq!(lookback_days(Span::ZERO), 0);
        assert_eq!(lookback_days(Span::from_hms(5, 30, 0)), 1);
        assert_eq!(lookback_days(Span::from_hms(24, 0, 1)), 2);
        assert_eq!(lookback_days(Span::from_hms(400, 0, 0)), 6);
    }
}
