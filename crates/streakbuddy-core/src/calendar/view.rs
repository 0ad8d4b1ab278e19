use serde::{Deserialize, Serialize};

use super::month::YearMonth;
use crate::day::LocalDay;
use crate::streak::{CompletionRecord, StreakState};

/// Display state of a single calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Completed,
    /// Inside the current streak window, in the past, but not finished.
    Missed,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayState {
    pub date: LocalDay,
    pub status: DayStatus,
    pub is_today: bool,
}

impl DayState {
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }
}

/// Every cell of one displayed month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub month: YearMonth,
    pub leading_blanks: u32,
    pub streak_start: Option<LocalDay>,
    pub days: Vec<DayState>,
}

impl MonthView {
    pub fn day(&self, day_of_month: u32) -> Option<&DayState> {
        self.days.get(day_of_month.checked_sub(1)? as usize)
    }

    pub fn count(&self, status: DayStatus) -> usize {
        self.days.iter().filter(|d| d.status == status).count()
    }

    /// Rows of a Sunday-first week grid; `None` is a blank cell.
    pub fn weeks(&self) -> Vec<[Option<DayState>; 7]> {
        let mut cells: Vec<Option<DayState>> = vec![None; self.leading_blanks as usize];
        cells.extend(self.days.iter().copied().map(Some));
        cells
            .chunks(7)
            .map(|chunk| {
                let mut row = [None; 7];
                row[..chunk.len()].copy_from_slice(chunk);
                row
            })
            .collect()
    }
}

/// Classify every day of `month`.
///
/// The record is authoritative for `Completed`. The streak window only
/// decides which unfinished past days count as `Missed`.
pub fn derive_month(
    month: YearMonth,
    today: LocalDay,
    streak: &StreakState,
    record: &CompletionRecord,
) -> MonthView {
    let streak_start = streak.start();

    let days = month
        .days()
        .map(|date| {
            let status = if record.contains(date) {
                DayStatus::Completed
            } else if date < today && streak_start.is_some_and(|start| date >= start) {
                DayStatus::Missed
            } else {
                DayStatus::Neutral
            };
            DayState {
                date,
                status,
                is_today: date == today,
            }
        })
        .collect();

    MonthView {
        month,
        leading_blanks: month.leading_blanks(),
        streak_start,
        days,
    }
}
