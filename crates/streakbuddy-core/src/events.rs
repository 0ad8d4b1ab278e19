use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::day::LocalDay;
use crate::streak::StreakState;

/// Every state change in the system produces an Event.
/// The CLI prints them with `--json`; the reminder watcher streams them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The health check found a skipped day and reset the streak.
    StreakBroken {
        previous_count: u32,
        last_completion: LocalDay,
        at: LocalDay,
    },
    /// `count` and `last_completion` disagreed and were reconciled.
    StreakRepaired {
        previous: StreakState,
        at: LocalDay,
    },
    DayFinished {
        day: LocalDay,
        count: u32,
        /// `true` when yesterday was finished too.
        continued: bool,
    },
    /// "Finish day" ran again on a day that was already finished.
    AlreadyFinished {
        day: LocalDay,
        count: u32,
    },
    ReminderScheduled {
        task_id: String,
        title: String,
        fire_at: NaiveDateTime,
    },
    ReminderFired {
        task_id: String,
        title: String,
        at: NaiveDateTime,
    },
    /// The owning task was removed before the reminder fired.
    ReminderCancelled {
        task_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::DayFinished {
            day: LocalDay::parse("2024-03-10").unwrap(),
            count: 3,
            continued: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "day_finished");
        assert_eq!(json["day"], "2024-03-10");
        assert_eq!(json["count"], 3);
    }
}
