//! Session state for one run of the tracker.
//!
//! [`Tracker`] owns the loaded streak, the completion record and the displayed
//! month. Persistence goes through the injected [`KvStore`]; rendering and
//! notifications through the collaborators passed into each call.

use chrono::NaiveTime;
use tracing::debug;

use crate::calendar::{derive_month, MonthView, YearMonth};
use crate::day::LocalDay;
use crate::error::Result;
use crate::events::Event;
use crate::notify::{celebration_message, Notifier};
use crate::render::RenderTarget;
use crate::stats::HistoryStats;
use crate::storage::{self, KvStore};
use crate::streak::{self, CompletionRecord, FinishOutcome, HealthReport, StreakState};
use crate::task::{Task, TaskList};

pub struct Tracker<S: KvStore> {
    store: S,
    today: LocalDay,
    streak: StreakState,
    record: CompletionRecord,
    viewed: YearMonth,
    celebrate: bool,
    events: Vec<Event>,
}

impl<S: KvStore> Tracker<S> {
    /// Load persisted state and run the streak health check.
    ///
    /// A reset found by the health check is written back before returning.
    pub fn open(store: S, today: LocalDay) -> Result<Self> {
        let streak = storage::load_streak(&store)?;
        let record = storage::load_record(&store)?;
        let mut tracker = Self {
            store,
            today,
            streak,
            record,
            viewed: YearMonth::of(today),
            celebrate: true,
            events: Vec::new(),
        };
        tracker.check_health()?;
        Ok(tracker)
    }

    /// Whether finishing a day sends a celebratory notification.
    pub fn with_celebration(mut self, celebrate: bool) -> Self {
        self.celebrate = celebrate;
        self
    }

    pub fn today(&self) -> LocalDay {
        self.today
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn record(&self) -> &CompletionRecord {
        &self.record
    }

    pub fn viewed_month(&self) -> YearMonth {
        self.viewed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Events produced since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Re-run the health check. Safe to call any number of times.
    pub fn check_health(&mut self) -> Result<HealthReport> {
        let report = streak::check_health(&mut self.streak, self.today);
        match report {
            HealthReport::Healthy => {}
            HealthReport::Broken {
                previous_count,
                last_completion,
            } => {
                storage::save_streak(&mut self.store, &self.streak)?;
                self.events.push(Event::StreakBroken {
                    previous_count,
                    last_completion,
                    at: self.today,
                });
            }
            HealthReport::Repaired { previous } => {
                storage::save_streak(&mut self.store, &self.streak)?;
                self.events.push(Event::StreakRepaired {
                    previous,
                    at: self.today,
                });
            }
        }
        Ok(report)
    }

    /// Mark today finished, persist, redraw and celebrate.
    ///
    /// Finishing twice on the same day changes nothing and draws nothing.
    pub fn finish_day(
        &mut self,
        render: &mut dyn RenderTarget,
        notifier: &dyn Notifier,
    ) -> Result<FinishOutcome> {
        let outcome = streak::finish_day(&mut self.streak, &mut self.record, self.today);

        if let FinishOutcome::AlreadyFinished { count } = outcome {
            self.events.push(Event::AlreadyFinished {
                day: self.today,
                count,
            });
            return Ok(outcome);
        }

        storage::save_record(&mut self.store, &self.record)?;
        storage::save_streak(&mut self.store, &self.streak)?;

        self.events.push(Event::DayFinished {
            day: self.today,
            count: self.streak.count,
            continued: matches!(outcome, FinishOutcome::Continued { .. }),
        });

        self.refresh(render);
        if self.celebrate {
            notifier.notify(&celebration_message(self.streak.count));
        }
        Ok(outcome)
    }

    /// Push the streak display and the viewed month to the render target.
    pub fn refresh(&self, render: &mut dyn RenderTarget) {
        render.update_streak_display(self.streak.count, self.streak.last_completion);
        let view = self.month_view(self.viewed);
        render.render_calendar(view.month, &view.days);
    }

    pub fn month_view(&self, month: YearMonth) -> MonthView {
        derive_month(month, self.today, &self.streak, &self.record)
    }

    /// Display an arbitrary month. Persisted state is untouched.
    pub fn show_month(&mut self, month: YearMonth, render: &mut dyn RenderTarget) {
        debug!(month = %month, "showing month");
        self.viewed = month;
        let view = self.month_view(month);
        render.render_calendar(view.month, &view.days);
    }

    pub fn show_previous_month(&mut self, render: &mut dyn RenderTarget) {
        self.show_month(self.viewed.previous(), render);
    }

    pub fn show_next_month(&mut self, render: &mut dyn RenderTarget) {
        self.show_month(self.viewed.next(), render);
    }

    pub fn stats(&self, month: Option<YearMonth>) -> HistoryStats {
        HistoryStats::compute(
            &self.record,
            &self.streak,
            month.map(|m| self.month_view(m)).as_ref(),
        )
    }

    pub fn tasks(&self) -> Result<TaskList> {
        storage::load_tasks(&self.store)
    }

    pub fn add_task(&mut self, title: &str, remind_at: Option<NaiveTime>) -> Result<Task> {
        let mut tasks = storage::load_tasks(&self.store)?;
        let task = tasks.add(title, remind_at)?.clone();
        storage::save_tasks(&mut self.store, &tasks)?;
        Ok(task)
    }

    /// Remove a task by id or 1-based position. The caller cancels any
    /// reminder scheduled for the returned task.
    pub fn remove_task(&mut self, selector: &str) -> Result<Task> {
        let mut tasks = storage::load_tasks(&self.store)?;
        let task = tasks.remove(selector)?;
        storage::save_tasks(&mut self.store, &tasks)?;
        Ok(task)
    }
}
