//! Integration tests for tracker sessions over a SQLite store.
//!
//! This test file verifies:
//! - State survives closing and reopening the database across days
//! - A skipped day is detected on the next session load
//! - The calendar example month derives the expected cells
//! - Legacy dumps import into a fresh database

use streakbuddy_core::storage::{export_snapshot, import_snapshot};
use streakbuddy_core::{
    CapturedFrame, Database, DayStatus, Event, LocalDay, RecordingNotifier, StreakState, Tracker,
    YearMonth,
};

fn day(s: &str) -> LocalDay {
    LocalDay::parse(s).unwrap()
}

fn finish_on(path: &std::path::Path, today: &str) -> Tracker<Database> {
    let db = Database::open_at(path).unwrap();
    let mut tracker = Tracker::open(db, day(today)).unwrap();
    let mut frame = CapturedFrame::default();
    tracker.finish_day(&mut frame, &RecordingNotifier::new()).unwrap();
    tracker
}

#[test]
fn streak_carries_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("streakbuddy.db");

    finish_on(&path, "2024-03-08");
    finish_on(&path, "2024-03-09");
    let tracker = finish_on(&path, "2024-03-10");
    assert_eq!(*tracker.streak(), StreakState::new(3, Some(day("2024-03-10"))));

    let tracker = Tracker::open(Database::open_at(&path).unwrap(), day("2024-03-11")).unwrap();
    let view = tracker.month_view(YearMonth::parse("2024-03").unwrap());
    assert_eq!(view.streak_start, Some(day("2024-03-08")));
    assert_eq!(view.day(7).unwrap().status, DayStatus::Neutral);
    assert_eq!(view.day(10).unwrap().status, DayStatus::Completed);
    assert!(!view.day(10).unwrap().is_today);
    assert_eq!(view.day(11).unwrap().status, DayStatus::Neutral);
    assert!(view.day(11).unwrap().is_today);
}

#[test]
fn skipped_day_breaks_streak_on_next_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("streakbuddy.db");

    finish_on(&path, "2024-03-08");
    finish_on(&path, "2024-03-09");

    let mut tracker = Tracker::open(Database::open_at(&path).unwrap(), day("2024-03-11")).unwrap();
    assert_eq!(tracker.streak().count, 0);
    assert_eq!(
        tracker.drain_events(),
        vec![Event::StreakBroken {
            previous_count: 2,
            last_completion: day("2024-03-09"),
            at: day("2024-03-11"),
        }]
    );
    assert_eq!(tracker.record().len(), 2);
    drop(tracker);

    let tracker = finish_on(&path, "2024-03-11");
    assert_eq!(tracker.streak().count, 1);
    let view = tracker.month_view(YearMonth::parse("2024-03").unwrap());
    assert_eq!(view.day(8).unwrap().status, DayStatus::Completed);
    assert_eq!(view.day(10).unwrap().status, DayStatus::Neutral);
}

#[test]
fn leap_day_streak() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("streakbuddy.db");
    finish_on(&path, "2024-02-28");
    finish_on(&path, "2024-02-29");
    let tracker = finish_on(&path, "2024-03-01");
    assert_eq!(tracker.streak().count, 3);
    assert_eq!(tracker.stats(None).longest_streak, 3);
}

#[test]
fn import_then_export_into_database() {
    let mut db = Database::open_memory().unwrap();
    let dump = r#"{"streak":"2","lastCompletion":"10-03-2024","completedDays":"{\"09-03-2024\":true}"}"#;
    let summary = import_snapshot(&mut db, dump).unwrap();
    assert_eq!(summary.new_days, 2);

    let out = export_snapshot(&db).unwrap();
    assert_eq!(out["lastCompletion"], "2024-03-10");
    assert_eq!(out["completedDays"]["2024-03-09"], true);

    let tracker = Tracker::open(db, day("2024-03-11")).unwrap();
    assert_eq!(tracker.streak().count, 2);
}
