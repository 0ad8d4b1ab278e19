//! Property tests for the streak engine.
//!
//! This test file verifies:
//! - N consecutive finishes give a streak of N
//! - Any gap of two or more days restarts the streak at 1
//! - Finishing twice on the same day changes nothing
//! - The health check only ever resets, and never touches the record

use proptest::prelude::*;
use streakbuddy_core::{check_health, finish_day, CompletionRecord, HealthReport, LocalDay, StreakState};

fn base_day() -> LocalDay {
    LocalDay::parse("2023-12-20").unwrap()
}

proptest! {
    #[test]
    fn consecutive_finishes_count_up(start in 0i64..2000, n in 1u32..120) {
        let first = base_day().add_days(start);
        let mut state = StreakState::default();
        let mut record = CompletionRecord::new();
        for i in 0..n {
            finish_day(&mut state, &mut record, first.add_days(i64::from(i)));
        }
        prop_assert_eq!(state.count, n);
        prop_assert_eq!(record.len(), n as usize);
        prop_assert_eq!(state.start(), Some(first));
    }

    #[test]
    fn gap_restarts_at_one(run in 1u32..30, gap in 2i64..400) {
        let mut state = StreakState::default();
        let mut record = CompletionRecord::new();
        for i in 0..run {
            finish_day(&mut state, &mut record, base_day().add_days(i64::from(i)));
        }
        let last = state.last_completion.unwrap();
        finish_day(&mut state, &mut record, last.add_days(gap));
        prop_assert_eq!(state.count, 1);
    }

    #[test]
    fn same_day_repeat_is_idempotent(offsets in proptest::collection::vec(0i64..3, 1..40)) {
        let mut state = StreakState::default();
        let mut record = CompletionRecord::new();
        let mut today = base_day();
        for step in offsets {
            today = today.add_days(step);
            finish_day(&mut state, &mut record, today);
            let snapshot = (state, record.clone());
            finish_day(&mut state, &mut record, today);
            prop_assert_eq!((state, record.clone()), snapshot);
        }
    }

    #[test]
    fn health_check_resets_only_after_a_skipped_day(count in 1u32..500, back in 0i64..10) {
        let today = base_day();
        let mut state = StreakState::new(count, Some(today.add_days(-back)));
        let report = check_health(&mut state, today);
        if back <= 1 {
            prop_assert_eq!(report, HealthReport::Healthy);
            prop_assert_eq!(state.count, count);
        } else {
            prop_assert!(matches!(report, HealthReport::Broken { .. }), "expected Broken, got {:?}", report);
            prop_assert_eq!(state, StreakState::default());
            prop_assert_eq!(check_health(&mut state, today), HealthReport::Healthy);
        }
    }
}

#[test]
fn health_check_two_days_back_resets() {
    let today = LocalDay::parse("2024-03-11").unwrap();
    let mut state = StreakState::new(3, Some(LocalDay::parse("2024-03-09").unwrap()));
    check_health(&mut state, today);
    assert_eq!(state.count, 0);
    assert_eq!(state.last_completion, None);

    let mut state = StreakState::new(3, Some(LocalDay::parse("2024-03-10").unwrap()));
    let before = state;
    check_health(&mut state, today);
    assert_eq!(state, before);
}
