use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::day::LocalDay;

/// Durable set of days that were marked finished.
///
/// Persisted as a JSON object mapping `YYYY-MM-DD` to `true`. Entries with a
/// `false` value are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<LocalDay, bool>", into = "BTreeMap<LocalDay, bool>")]
pub struct CompletionRecord {
    days: BTreeSet<LocalDay>,
}

impl CompletionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: LocalDay) -> bool {
        self.days.contains(&day)
    }

    /// Mark a day finished. Returns `false` if it was already present.
    pub fn insert(&mut self, day: LocalDay) -> bool {
        self.days.insert(day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, LocalDay> {
        self.days.iter()
    }

    pub fn first(&self) -> Option<LocalDay> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<LocalDay> {
        self.days.last().copied()
    }

    /// Decode the persisted JSON form. Unknown keys, non-boolean values and
    /// unparsable documents are dropped with a warning instead of failing.
    pub fn from_json_lenient(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("completedDays is not valid JSON, starting empty: {e}");
                return Self::default();
            }
        };
        let Some(map) = value.as_object() else {
            warn!("completedDays is not a JSON object, starting empty");
            return Self::default();
        };

        let mut record = Self::default();
        for (key, flag) in map {
            let Ok(day) = LocalDay::parse(key) else {
                warn!(key = %key, "skipping completedDays entry with malformed day");
                continue;
            };
            if flag.as_bool() == Some(true) {
                record.insert(day);
            }
        }
        record
    }

    pub fn to_json(&self) -> String {
        let map: BTreeMap<String, bool> =
            self.days.iter().map(|d| (d.to_string(), true)).collect();
        // A map of strings to bools always serializes.
        serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<BTreeMap<LocalDay, bool>> for CompletionRecord {
    fn from(map: BTreeMap<LocalDay, bool>) -> Self {
        Self {
            days: map
                .into_iter()
                .filter_map(|(day, done)| done.then_some(day))
                .collect(),
        }
    }
}

impl From<CompletionRecord> for BTreeMap<LocalDay, bool> {
    fn from(record: CompletionRecord) -> Self {
        record.days.into_iter().map(|d| (d, true)).collect()
    }
}

impl FromIterator<LocalDay> for CompletionRecord {
    fn from_iter<I: IntoIterator<Item = LocalDay>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CompletionRecord {
    type Item = &'a LocalDay;
    type IntoIter = btree_set::Iter<'a, LocalDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> LocalDay {
        LocalDay::parse(s).unwrap()
    }

    #[test]
    fn lenient_decode_skips_bad_entries() {
        let raw = r#"{"2024-03-08": true, "2024-03-09": false, "garbage": true, "2024-03-10": "yes", "2024-03-11": true}"#;
        let record = CompletionRecord::from_json_lenient(raw);
        assert_eq!(record.len(), 2);
        assert!(record.contains(day("2024-03-08")));
        assert!(!record.contains(day("2024-03-09")));
        assert!(record.contains(day("2024-03-11")));
    }

    #[test]
    fn lenient_decode_of_non_object_is_empty() {
        assert!(CompletionRecord::from_json_lenient("not json").is_empty());
        assert!(CompletionRecord::from_json_lenient("[1,2,3]").is_empty());
        assert!(CompletionRecord::from_json_lenient("").is_empty());
    }

    #[test]
    fn json_form_matches_persisted_shape() {
        let record: CompletionRecord = [day("2024-03-09"), day("2024-03-08")].into_iter().collect();
        assert_eq!(record.to_json(), r#"{"2024-03-08":true,"2024-03-09":true}"#);
        assert_eq!(CompletionRecord::from_json_lenient(&record.to_json()), record);
    }
}
