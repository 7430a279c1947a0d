//! Arrival, closing and departure alerts over the week fixture.
mod common;

use merchant_board::merchant::{ActivityTracker, DayOfWeek, Span};
use merchant_board::render;

#[test]
fn follows_the_sunday_evening_window() {
    let index = common::fixture_index();
    let mut tracker = ActivityTracker::new(Span::from_hms(0, 30, 0));

    // Quiet afternoon
    assert!(tracker.observe(&index, &common::at(0, 20, 0)).is_empty());

    let opened = tracker.observe(&index, &common::at(0, 22, 0));
    assert_eq!(opened.appeared.len(), 1);
    let ben = &opened.appeared[0];
    assert_eq!(ben.key.region_name, "Artemis");
    assert_eq!(ben.key.day, DayOfWeek::SUNDAY);
    assert_eq!(ben.key.npc_name, "Ben");
    assert_eq!(ben.ends_at, common::at(1, 3, 30));
    let notable: Vec<_> = ben.notable_items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(notable, vec!["Legend Rapport Pack", "Thumping Box", "Rare Essence"]);

    // Still open after midnight: nothing new.
    assert!(tracker.observe(&index, &common::at(1, 1, 0)).is_empty());

    let closing = tracker.observe(&index, &common::at(1, 3, 10));
    assert_eq!(closing.ending_soon.len(), 1);
    assert!(closing.appeared.is_empty());
    assert!(tracker.observe(&index, &common::at(1, 3, 20)).is_empty());

    let gone = tracker.observe(&index, &common::at(1, 3, 30));
    assert_eq!(gone.departed.len(), 1);
    assert_eq!(gone.departed[0].region_name, "Artemis");
    assert!(tracker.active().is_empty());
}

#[test]
fn first_observation_reports_everyone_open() {
    let index = common::fixture_index();
    let mut tracker = ActivityTracker::new(Span::from_hms(0, 30, 0));
    let changes = tracker.observe(&index, &common::at(0, 11, 0));
    let names: Vec<_> = changes
        .appeared
        .iter()
        .map(|a| a.key.region_name.as_str())
        .collect();
    assert_eq!(names, vec!["Artemis", "Yudia"]);
    assert_eq!(tracker.active().len(), 2);
}

#[test]
fn unresolved_groups_raise_no_alerts() {
    let index = common::fixture_index();
    let mut tracker = ActivityTracker::new(Span::from_hms(0, 30, 0));
    assert!(tracker.observe(&index, &common::at(3, 17, 0)).is_empty());
}

#[test]
fn change_lines_render_for_the_log() {
    let index = common::fixture_index();
    let mut tracker = ActivityTracker::new(Span::from_hms(1, 0, 0));
    tracker.observe(&index, &common::at(0, 22, 0));
    let lines = render::changes(&tracker.observe(&index, &common::at(1, 2, 45)));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Merchant closing in 45m: Artemis - Ben"));
}
