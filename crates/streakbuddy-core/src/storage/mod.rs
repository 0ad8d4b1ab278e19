mod config;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod state;
pub mod transfer;

pub use config::{CalendarConfig, Config, NotificationsConfig, RemindersConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use state::{load_record, load_streak, load_tasks, save_record, save_streak, save_tasks};
pub use transfer::{export_snapshot, import_snapshot, ImportSummary};

use std::path::PathBuf;

use crate::error::Result;

/// Persisted key for `StreakState::count`.
pub const KEY_STREAK: &str = "streak";
/// Persisted key for `StreakState::last_completion`.
pub const KEY_LAST_COMPLETION: &str = "lastCompletion";
/// Persisted key for the completion record.
pub const KEY_COMPLETED_DAYS: &str = "completedDays";
/// Persisted key for the task list.
pub const KEY_USER_TASKS: &str = "userTasks";

/// String key-value persistence boundary.
///
/// Reads return `Ok(None)` for absent keys; callers decide what a malformed
/// value means.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Returns the data directory, creating it if needed.
///
/// `STREAKBUDDY_DATA_DIR` wins when set. Otherwise `~/.config/streakbuddy`,
/// or `~/.config/streakbuddy-dev` when `STREAKBUDDY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Some(explicit) = std::env::var_os("STREAKBUDDY_DATA_DIR") {
        PathBuf::from(explicit)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("STREAKBUDDY_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("streakbuddy-dev")
        } else {
            base_dir.join("streakbuddy")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
