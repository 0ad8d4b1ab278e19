//! Render target interface.
//!
//! The tracker pushes derived state here after every change. Implementations
//! live at the edges (terminal, JSON, tests).

use crate::calendar::{DayState, YearMonth};
use crate::day::LocalDay;

pub trait RenderTarget {
    /// Draw one month. `days` holds every day of the month in order.
    fn render_calendar(&mut self, month: YearMonth, days: &[DayState]);

    fn update_streak_display(&mut self, count: u32, last_completion: Option<LocalDay>);
}

/// Remembers the most recent frame instead of drawing it.
#[derive(Debug, Default, Clone)]
pub struct CapturedFrame {
    pub month: Option<YearMonth>,
    pub days: Vec<DayState>,
    pub streak: Option<(u32, Option<LocalDay>)>,
    pub calendar_renders: usize,
}

impl RenderTarget for CapturedFrame {
    fn render_calendar(&mut self, month: YearMonth, days: &[DayState]) {
        self.month = Some(month);
        self.days = days.to_vec();
        self.calendar_renders += 1;
    }

    fn update_streak_display(&mut self, count: u32, last_completion: Option<LocalDay>) {
        self.streak = Some((count, last_completion));
    }
}
