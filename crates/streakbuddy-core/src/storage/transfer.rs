//! Import and export of browser-era localStorage dumps.
//!
//! A dump is a JSON object keyed like localStorage. Values may be native JSON
//! or strings holding JSON, since localStorage only stores strings. Days may
//! be `YYYY-MM-DD` or `DD-MM-YYYY`; everything written back is canonical.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::state::{load_record, load_streak, load_tasks, save_record, save_streak, save_tasks};
use super::{KvStore, KEY_COMPLETED_DAYS, KEY_LAST_COMPLETION, KEY_STREAK, KEY_USER_TASKS};
use crate::day::LocalDay;
use crate::error::{CoreError, Result};
use crate::streak::{CompletionRecord, StreakState};
use crate::task::TaskList;

/// Per-day task arrays written by the checklist variant of the browser app.
const KEY_TASKS_DATA: &str = "tasksData";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Days that were not already in the record.
    pub new_days: usize,
    pub streak: StreakState,
    /// `None` when the dump carried no task list.
    pub tasks: Option<usize>,
    /// Entries that could not be read.
    pub skipped: usize,
}

/// Unwrap a localStorage string that holds JSON; plain strings stay strings.
fn decode(value: &Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn item_done(item: &Value) -> bool {
    match item {
        Value::Bool(b) => *b,
        Value::Object(obj) => ["done", "completed", "checked"]
            .iter()
            .any(|k| obj.get(*k).and_then(Value::as_bool) == Some(true)),
        _ => false,
    }
}

fn day_finished(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Array(items) => !items.is_empty() && items.iter().all(item_done),
        _ => false,
    }
}

/// Merge a dump into the store.
///
/// The record only grows. Streak fields from the dump replace the stored
/// ones when present, and the last completion day is always added to the
/// record.
pub fn import_snapshot<S: KvStore + ?Sized>(store: &mut S, raw: &str) -> Result<ImportSummary> {
    let root: Value = serde_json::from_str(raw)?;
    let Some(root) = root.as_object() else {
        return Err(CoreError::Custom("import file must be a JSON object".into()));
    };

    let mut record = load_record(store)?;
    let before = record.len();
    let mut streak = load_streak(store)?;
    let mut skipped = 0;

    for source in [KEY_COMPLETED_DAYS, KEY_TASKS_DATA] {
        let Some(value) = root.get(source).map(decode) else {
            continue;
        };
        let Some(days) = value.as_object() else {
            warn!(key = source, "import entry is not an object, skipping");
            skipped += 1;
            continue;
        };
        for (key, flag) in days {
            match LocalDay::parse_legacy(key) {
                Ok(day) if day_finished(flag) => {
                    record.insert(day);
                }
                Ok(_) => {}
                Err(_) => {
                    warn!(key = %key, "skipping imported day with malformed date");
                    skipped += 1;
                }
            }
        }
    }

    if let Some(value) = root.get(KEY_STREAK).map(decode) {
        match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => streak.count = n,
            None => {
                warn!("imported streak is not a non-negative integer, keeping stored value");
                skipped += 1;
            }
        }
    }

    if let Some(value) = root.get(KEY_LAST_COMPLETION) {
        match value {
            Value::Null => streak.last_completion = None,
            Value::String(s) => match LocalDay::parse_legacy(s) {
                Ok(day) => streak.last_completion = Some(day),
                Err(_) => {
                    warn!(value = %s, "imported lastCompletion is malformed, keeping stored value");
                    skipped += 1;
                }
            },
            _ => skipped += 1,
        }
    }
    if let Some(last) = streak.last_completion {
        record.insert(last);
    }

    let tasks = match root.get(KEY_USER_TASKS).map(decode) {
        Some(value @ Value::Array(_)) => {
            let list = TaskList::from_json_lenient(&value.to_string());
            save_tasks(store, &list)?;
            Some(list.len())
        }
        Some(_) => {
            skipped += 1;
            None
        }
        None => None,
    };

    save_record(store, &record)?;
    save_streak(store, &streak)?;

    let summary = ImportSummary {
        new_days: record.len() - before,
        streak,
        tasks,
        skipped,
    };
    info!(new_days = summary.new_days, skipped, "import finished");
    Ok(summary)
}

/// Dump the canonical keys as a JSON object.
pub fn export_snapshot<S: KvStore + ?Sized>(store: &S) -> Result<Value> {
    let streak = load_streak(store)?;
    let record: CompletionRecord = load_record(store)?;
    let tasks = load_tasks(store)?;
    Ok(json!({
        KEY_STREAK: streak.count,
        KEY_LAST_COMPLETION: streak.last_completion,
        KEY_COMPLETED_DAYS: record,
        KEY_USER_TASKS: tasks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(s: &str) -> LocalDay {
        LocalDay::parse(s).unwrap()
    }

    #[test]
    fn imports_stringified_local_storage_dump() {
        let dump = r#"{
            "streak": "2",
            "lastCompletion": "2024-03-10",
            "completedDays": "{\"2024-03-09\":true,\"2024-03-10\":true}",
            "userTasks": "[\"Read\",\"Walk\"]"
        }"#;
        let mut store = MemoryStore::new();
        let summary = import_snapshot(&mut store, dump).unwrap();

        assert_eq!(summary.new_days, 2);
        assert_eq!(summary.streak, StreakState::new(2, Some(day("2024-03-10"))));
        assert_eq!(summary.tasks, Some(2));
        assert_eq!(summary.skipped, 0);
        assert_eq!(load_streak(&store).unwrap(), summary.streak);
        assert!(load_record(&store).unwrap().contains(day("2024-03-09")));
    }

    #[test]
    fn imports_legacy_dates_and_task_arrays() {
        let dump = json!({
            "streak": 1,
            "lastCompletion": "12-03-2024",
            "tasksData": {
                "11-03-2024": [{"text": "a", "done": true}, {"text": "b", "done": true}],
                "12-03-2024": [{"text": "a", "done": true}],
                "13-03-2024": [{"text": "a", "done": false}],
                "14-03-2024": [],
                "someday": [{"done": true}]
            }
        });
        let mut store = MemoryStore::new();
        let summary = import_snapshot(&mut store, &dump.to_string()).unwrap();

        let record = load_record(&store).unwrap();
        assert_eq!(record.iter().copied().collect::<Vec<_>>(), vec![day("2024-03-11"), day("2024-03-12")]);
        assert_eq!(summary.streak.last_completion, Some(day("2024-03-12")));
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.tasks, None);
    }

    #[test]
    fn import_merges_with_existing_record() {
        let mut store = MemoryStore::with_entries([("completedDays", r#"{"2024-01-01":true}"#)]);
        let summary = import_snapshot(&mut store, r#"{"completedDays": {"2024-01-01": true, "2024-01-02": true}}"#).unwrap();
        assert_eq!(summary.new_days, 1);
        assert_eq!(load_record(&store).unwrap().len(), 2);
    }

    #[test]
    fn last_completion_is_added_to_record() {
        let mut store = MemoryStore::new();
        import_snapshot(&mut store, r#"{"streak": 1, "lastCompletion": "2024-05-05"}"#).unwrap();
        assert!(load_record(&store).unwrap().contains(day("2024-05-05")));
    }

    #[test]
    fn non_object_dump_is_rejected() {
        let mut store = MemoryStore::new();
        assert!(import_snapshot(&mut store, "[1, 2]").is_err());
        assert!(import_snapshot(&mut store, "nope").is_err());
    }

    #[test]
    fn export_uses_canonical_keys() {
        let mut store = MemoryStore::new();
        import_snapshot(&mut store, r#"{"streak": "1", "lastCompletion": "05-05-2024", "userTasks": []}"#).unwrap();
        let out = export_snapshot(&store).unwrap();
        assert_eq!(out["streak"], json!(1));
        assert_eq!(out["lastCompletion"], json!("2024-05-05"));
        assert_eq!(out["completedDays"], json!({"2024-05-05": true}));
        assert_eq!(out["userTasks"], json!([]));
    }
}
