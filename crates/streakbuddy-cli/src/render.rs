//! Terminal and JSON render targets.

use std::io::Write;

use serde_json::{json, Value};
use streakbuddy_core::storage::CalendarConfig;
use streakbuddy_core::{DayState, DayStatus, LocalDay, RenderTarget, YearMonth};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const CELL_WIDTH: usize = 5;

/// Draws the streak line and a Sunday-first month grid.
pub struct TerminalRenderer<W: Write> {
    out: W,
    marks: CalendarConfig,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, marks: CalendarConfig) -> Self {
        Self { out, marks }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn mark(&self, status: DayStatus) -> &str {
        match status {
            DayStatus::Completed => &self.marks.completed_mark,
            DayStatus::Missed => &self.marks.missed_mark,
            DayStatus::Neutral => &self.marks.neutral_mark,
        }
    }

    fn cell(&self, day: &DayState) -> String {
        let body = format!("{:>2}{}", day.day_of_month(), self.mark(day.status));
        if day.is_today {
            let mut brackets = self.marks.today_mark.chars();
            let open = brackets.next().unwrap_or('[');
            let close = brackets.next().unwrap_or(']');
            format!("{open}{body}{close}")
        } else {
            format!(" {body} ")
        }
    }
}

impl<W: Write> RenderTarget for TerminalRenderer<W> {
    fn render_calendar(&mut self, month: YearMonth, days: &[DayState]) {
        let title = format!("{} {}", month.name(), month.year());
        let width = CELL_WIDTH * 7;
        let mut text = format!("{title:^width$}\n");
        for name in WEEKDAYS {
            text.push_str(&format!(" {name:>3} "));
        }
        text.push('\n');

        let blanks = month.leading_blanks() as usize;
        let mut column = 0;
        for _ in 0..blanks {
            text.push_str(&" ".repeat(CELL_WIDTH));
            column += 1;
        }
        for day in days {
            text.push_str(&self.cell(day));
            column += 1;
            if column % 7 == 0 {
                text.push('\n');
            }
        }
        if column % 7 != 0 {
            text.push('\n');
        }
        let _ = self.out.write_all(text.as_bytes());
    }

    fn update_streak_display(&mut self, count: u32, last_completion: Option<LocalDay>) {
        let unit = if count == 1 { "day" } else { "days" };
        let last = last_completion
            .map(|d| d.to_string())
            .unwrap_or_else(|| "None".to_string());
        let _ = writeln!(self.out, "🔥 Streak: {count} {unit}\nLast completion: {last}\n");
    }
}

/// Collects what would be drawn as JSON values.
#[derive(Default)]
pub struct JsonRenderer {
    pub streak: Option<Value>,
    pub calendar: Option<Value>,
}

impl JsonRenderer {
    pub fn into_value(self) -> Value {
        json!({
            "streak": self.streak,
            "calendar": self.calendar,
        })
    }
}

impl RenderTarget for JsonRenderer {
    fn render_calendar(&mut self, month: YearMonth, days: &[DayState]) {
        self.calendar = Some(json!({
            "month": month,
            "leading_blanks": month.leading_blanks(),
            "days": days,
        }));
    }

    fn update_streak_display(&mut self, count: u32, last_completion: Option<LocalDay>) {
        self.streak = Some(json!({
            "count": count,
            "last_completion": last_completion,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streakbuddy_core::{derive_month, CompletionRecord, StreakState};

    fn day(s: &str) -> LocalDay {
        LocalDay::parse(s).unwrap()
    }

    #[test]
    fn terminal_grid_marks_days() {
        let streak = StreakState::new(3, Some(day("2024-03-10")));
        let record: CompletionRecord = ["2024-03-08", "2024-03-10"].into_iter().map(day).collect();
        let month = YearMonth::parse("2024-03").unwrap();
        let view = derive_month(month, day("2024-03-11"), &streak, &record);

        let mut renderer = TerminalRenderer::new(Vec::new(), CalendarConfig::default());
        renderer.render_calendar(month, &view.days);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "March 2024");
        assert!(lines[1].contains("Su") && lines[1].contains("Sa"));
        assert!(lines[2].starts_with(&" ".repeat(CELL_WIDTH * 5)));
        assert!(lines[2].contains(" 1."));
        assert!(text.contains(" 8#"));
        assert!(text.contains(" 9x"));
        assert!(text.contains("[11.]"));
        assert_eq!(lines.len(), 2 + 6);
    }

    #[test]
    fn streak_line_pluralizes() {
        let mut renderer = TerminalRenderer::new(Vec::new(), CalendarConfig::default());
        renderer.update_streak_display(1, Some(day("2024-03-10")));
        renderer.update_streak_display(0, None);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("Streak: 1 day\n"));
        assert!(text.contains("Streak: 0 days"));
        assert!(text.contains("Last completion: None"));
    }

    #[test]
    fn json_renderer_keeps_last_frame() {
        let month = YearMonth::parse("2024-02").unwrap();
        let view = derive_month(month, day("2024-02-29"), &StreakState::default(), &CompletionRecord::new());
        let mut renderer = JsonRenderer::default();
        renderer.update_streak_display(2, Some(day("2024-02-28")));
        renderer.render_calendar(month, &view.days);
        let value = renderer.into_value();
        assert_eq!(value["streak"]["count"], 2);
        assert_eq!(value["calendar"]["month"], "2024-02");
        assert_eq!(value["calendar"]["days"].as_array().unwrap().len(), 29);
        assert_eq!(value["calendar"]["days"][28]["is_today"], true);
    }
}
