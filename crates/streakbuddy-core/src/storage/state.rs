//! Typed access to the persisted tracker keys.
//!
//! Loading never fails on content: absent or malformed values become the
//! empty state and a warning is logged. Only store-level failures propagate.

use tracing::warn;

use super::{KvStore, KEY_COMPLETED_DAYS, KEY_LAST_COMPLETION, KEY_STREAK, KEY_USER_TASKS};
use crate::day::LocalDay;
use crate::error::Result;
use crate::streak::{CompletionRecord, StreakState};
use crate::task::TaskList;

pub fn load_streak<S: KvStore + ?Sized>(store: &S) -> Result<StreakState> {
    let count = match store.get(KEY_STREAK)? {
        None => 0,
        Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
            warn!(value = %raw, "stored streak is not a non-negative integer, using 0");
            0
        }),
    };

    let last_completion = match store.get(KEY_LAST_COMPLETION)? {
        None => None,
        Some(raw) if raw.trim().is_empty() || raw == "null" => None,
        Some(raw) => match LocalDay::parse(&raw) {
            Ok(day) => Some(day),
            Err(_) => {
                warn!(value = %raw, "stored lastCompletion is malformed, ignoring");
                None
            }
        },
    };

    Ok(StreakState::new(count, last_completion))
}

pub fn save_streak<S: KvStore + ?Sized>(store: &mut S, state: &StreakState) -> Result<()> {
    store.set(KEY_STREAK, &state.count.to_string())?;
    match state.last_completion {
        Some(day) => store.set(KEY_LAST_COMPLETION, &day.to_string()),
        None => store.remove(KEY_LAST_COMPLETION),
    }
}

pub fn load_record<S: KvStore + ?Sized>(store: &S) -> Result<CompletionRecord> {
    Ok(store
        .get(KEY_COMPLETED_DAYS)?
        .map(|raw| CompletionRecord::from_json_lenient(&raw))
        .unwrap_or_default())
}

pub fn save_record<S: KvStore + ?Sized>(store: &mut S, record: &CompletionRecord) -> Result<()> {
    store.set(KEY_COMPLETED_DAYS, &record.to_json())
}

/// Load the task list. A store that has never held tasks gets the defaults.
pub fn load_tasks<S: KvStore + ?Sized>(store: &S) -> Result<TaskList> {
    Ok(match store.get(KEY_USER_TASKS)? {
        Some(raw) => TaskList::from_json_lenient(&raw),
        None => TaskList::with_defaults(),
    })
}

pub fn save_tasks<S: KvStore + ?Sized>(store: &mut S, tasks: &TaskList) -> Result<()> {
    store.set(KEY_USER_TASKS, &tasks.to_json()?)
}
