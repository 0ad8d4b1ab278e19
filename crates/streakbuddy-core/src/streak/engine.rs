//! Streak transitions.
//!
//! Both operations are pure: they take the state and "today" explicitly and
//! report what changed. Persistence and rendering happen in the tracker.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::record::CompletionRecord;
use crate::day::LocalDay;

/// Current streak and the day it ends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub count: u32,
    pub last_completion: Option<LocalDay>,
}

impl StreakState {
    pub fn new(count: u32, last_completion: Option<LocalDay>) -> Self {
        Self {
            count,
            last_completion,
        }
    }

    /// First day of the current unbroken streak, if there is one.
    pub fn start(&self) -> Option<LocalDay> {
        let last = self.last_completion?;
        if self.count == 0 {
            return None;
        }
        Some(last.add_days(-(i64::from(self.count) - 1)))
    }
}

/// Result of a "finish day" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FinishOutcome {
    /// Today was already the last completion; nothing changed.
    AlreadyFinished { count: u32 },
    /// Yesterday was the last completion; the streak grew.
    Continued { count: u32 },
    /// First completion, or the previous streak had lapsed.
    Started { previous: u32 },
}

impl FinishOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, FinishOutcome::AlreadyFinished { .. })
    }
}

/// Result of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "health", rename_all = "snake_case")]
pub enum HealthReport {
    /// Nothing to do.
    Healthy,
    /// A day was skipped; the streak was reset.
    Broken {
        previous_count: u32,
        last_completion: LocalDay,
    },
    /// `count` and `last_completion` disagreed and were brought back in line.
    Repaired { previous: StreakState },
}

impl HealthReport {
    pub fn changed(&self) -> bool {
        !matches!(self, HealthReport::Healthy)
    }
}

/// Mark `today` finished and advance the streak.
///
/// The guard is "today is already the last completion", not "today is in the
/// record": a record entry alone never blocks a transition.
pub fn finish_day(
    state: &mut StreakState,
    record: &mut CompletionRecord,
    today: LocalDay,
) -> FinishOutcome {
    if state.last_completion == Some(today) {
        return FinishOutcome::AlreadyFinished { count: state.count };
    }

    let previous = state.count;
    let outcome = if state.last_completion == Some(today.pred()) {
        state.count = state.count.saturating_add(1);
        FinishOutcome::Continued { count: state.count }
    } else {
        state.count = 1;
        FinishOutcome::Started { previous }
    };

    state.last_completion = Some(today);
    record.insert(today);

    info!(day = %today, count = state.count, "day finished");
    outcome
}

/// Reset the streak when the last completion is neither today nor yesterday.
///
/// Also reconciles `count` with `last_completion`: a zero count never keeps a
/// date, and a positive count without a date drops to zero. The record is
/// never touched.
pub fn check_health(state: &mut StreakState, today: LocalDay) -> HealthReport {
    let Some(last) = state.last_completion else {
        if state.count != 0 {
            let previous = *state;
            state.count = 0;
            return HealthReport::Repaired { previous };
        }
        return HealthReport::Healthy;
    };

    if last != today && last != today.pred() {
        let previous_count = state.count;
        *state = StreakState::default();
        info!(last = %last, today = %today, previous_count, "streak broken");
        return HealthReport::Broken {
            previous_count,
            last_completion: last,
        };
    }

    if state.count == 0 {
        let previous = *state;
        state.last_completion = None;
        return HealthReport::Repaired { previous };
    }

    HealthReport::Healthy
}
