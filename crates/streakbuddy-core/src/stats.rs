//! History statistics derived from the completion record.

use serde::{Deserialize, Serialize};

use crate::calendar::{DayStatus, MonthView, YearMonth};
use crate::day::LocalDay;
use crate::streak::{CompletionRecord, StreakState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStats {
    pub month: YearMonth,
    pub days_in_month: u32,
    pub completed: u32,
    pub missed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub current_streak: u32,
    pub last_completion: Option<LocalDay>,
    pub total_days: u32,
    pub longest_streak: u32,
    pub first_completion: Option<LocalDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthStats>,
}

impl HistoryStats {
    pub fn compute(
        record: &CompletionRecord,
        streak: &StreakState,
        view: Option<&MonthView>,
    ) -> Self {
        Self {
            current_streak: streak.count,
            last_completion: streak.last_completion,
            total_days: u32::try_from(record.len()).unwrap_or(u32::MAX),
            longest_streak: longest_run(record).max(streak.count),
            first_completion: record.first(),
            month: view.map(|v| MonthStats {
                month: v.month,
                days_in_month: u32::try_from(v.days.len()).unwrap_or(u32::MAX),
                completed: u32::try_from(v.count(DayStatus::Completed)).unwrap_or(u32::MAX),
                missed: u32::try_from(v.count(DayStatus::Missed)).unwrap_or(u32::MAX),
            }),
        }
    }
}

/// Longest run of consecutive days in the record.
pub fn longest_run(record: &CompletionRecord) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut previous: Option<LocalDay> = None;
    for &day in record {
        run = match previous {
            Some(p) if day.days_since(p) == 1 => run.saturating_add(1),
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::derive_month;

    fn day(s: &str) -> LocalDay {
        LocalDay::parse(s).unwrap()
    }

    fn record(days: &[&str]) -> CompletionRecord {
        days.iter().map(|d| day(d)).collect()
    }

    #[test]
    fn longest_run_spans_month_boundaries() {
        let r = record(&["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-03", "2024-02-04"]);
        assert_eq!(longest_run(&r), 3);
        assert_eq!(longest_run(&CompletionRecord::new()), 0);
    }

    #[test]
    fn compute_includes_month_breakdown() {
        let r = record(&["2024-03-07", "2024-03-09", "2024-03-10"]);
        let streak = StreakState::new(4, Some(day("2024-03-10")));
        let march = YearMonth::parse("2024-03").unwrap();
        let view = derive_month(march, day("2024-03-11"), &streak, &r);

        let stats = HistoryStats::compute(&r, &streak, Some(&view));
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.first_completion, Some(day("2024-03-07")));
        let month = stats.month.unwrap();
        assert_eq!(month.days_in_month, 31);
        assert_eq!(month.completed, 3);
        assert_eq!(month.missed, 1);
    }
}
