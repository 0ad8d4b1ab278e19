//! Daily task list.
//!
//! Tasks are an ordered list with an optional reminder time. The list is
//! persisted as a whole under the `userTasks` key; older builds stored a
//! plain array of titles, which still decodes.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::ValidationError;

/// Titles seeded into an empty installation.
pub const DEFAULT_TASKS: [&str; 4] = [
    "JS Sessions (10am - 12pm)",
    "UI/UX Lessons (2pm - 4pm)",
    "Code Practice (4pm - 5pm)",
    "Backtesting & Journaling (9pm - 12am)",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Local time of day the reminder fires, if any.
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub remind_at: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: &str, remind_at: Option<NaiveTime>) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            remind_at,
            created_at: Utc::now(),
        })
    }
}

/// Parse a reminder time given as `HH:MM` (24-hour clock).
pub fn parse_reminder_time(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

/// One persisted entry: either a full task or a bare title from older builds.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTask {
    Full(Task),
    Title(String),
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self {
            tasks: DEFAULT_TASKS
                .iter()
                .filter_map(|title| Task::new(title, None).ok())
                .collect(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, title: &str, remind_at: Option<NaiveTime>) -> Result<&Task, ValidationError> {
        let task = Task::new(title, remind_at)?;
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Find a task by id, id prefix, or 1-based position.
    pub fn position(&self, selector: &str) -> Option<usize> {
        let selector = selector.trim();
        if let Some(idx) = self.tasks.iter().position(|t| t.id == selector) {
            return Some(idx);
        }
        if let Ok(n) = selector.parse::<usize>() {
            if (1..=self.tasks.len()).contains(&n) {
                return Some(n - 1);
            }
        }
        let mut prefixed = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| selector.len() >= 4 && t.id.starts_with(selector));
        match (prefixed.next(), prefixed.next()) {
            (Some((idx, _)), None) => Some(idx),
            _ => None,
        }
    }

    pub fn get(&self, selector: &str) -> Option<&Task> {
        self.position(selector).map(|idx| &self.tasks[idx])
    }

    pub fn remove(&mut self, selector: &str) -> Result<Task, ValidationError> {
        let idx = self
            .position(selector)
            .ok_or_else(|| ValidationError::UnknownTask(selector.to_string()))?;
        Ok(self.tasks.remove(idx))
    }

    /// Decode the persisted JSON form, dropping entries that are neither a
    /// task object nor a non-empty title.
    pub fn from_json_lenient(raw: &str) -> Self {
        let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("userTasks is not a JSON array, using defaults: {e}");
                return Self::with_defaults();
            }
        };

        let mut list = Self::new();
        for entry in entries {
            match serde_json::from_value::<StoredTask>(entry) {
                Ok(StoredTask::Full(task)) => list.tasks.push(task),
                Ok(StoredTask::Title(title)) => match Task::new(&title, None) {
                    Ok(task) => list.tasks.push(task),
                    Err(_) => warn!("skipping blank task title"),
                },
                Err(e) => warn!("skipping unreadable task entry: {e}"),
            }
        }
        list
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.tasks)
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.collect_str(&t.format("%H:%M")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_reminder_time(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
