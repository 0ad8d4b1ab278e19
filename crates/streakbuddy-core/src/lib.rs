//! # Streak Buddy Core Library
//!
//! This library provides the core logic for the Streak Buddy daily-habit
//! tracker: mark a day finished, keep a consecutive-day streak, and show a
//! calendar heat-map of the completion history. The `streakbuddy` CLI is a
//! thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: pure transitions over [`StreakState`] and
//!   [`CompletionRecord`] (`finish_day`, `check_health`)
//! - **Calendar**: per-day display states for one [`YearMonth`]
//! - **Storage**: a string key-value boundary ([`KvStore`]) backed by SQLite,
//!   plus TOML configuration
//! - **Reminders**: cancellable per-task timers on tokio
//!
//! ## Key Components
//!
//! - [`Tracker`]: session state tying the engine to storage, rendering and
//!   notifications
//! - [`LocalDay`]: the one day type used for every comparison and key
//! - [`RenderTarget`] and [`Notifier`]: collaborators supplied by the caller

pub mod calendar;
pub mod day;
pub mod error;
pub mod events;
pub mod notify;
pub mod reminders;
pub mod render;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod task;
pub mod tracker;

pub use calendar::{derive_month, DayState, DayStatus, MonthView, YearMonth};
pub use day::LocalDay;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, RecordingNotifier, SilentNotifier};
pub use reminders::ReminderScheduler;
pub use render::{CapturedFrame, RenderTarget};
pub use stats::{HistoryStats, MonthStats};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use streak::{check_health, finish_day, CompletionRecord, FinishOutcome, HealthReport, StreakState};
pub use task::{Task, TaskList};
pub use tracker::Tracker;
