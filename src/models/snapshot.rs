//! Persisted snapshot of last-observed tasks, keyed by category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::TaskRecord;

/// Last-observed tasks for one category, keyed by task id.
pub type CategorySnapshot = HashMap<String, TaskRecord>;

/// The full persisted state: category key → category snapshot.
///
/// Serializes transparently, so the durable document's top level is the
/// category map itself. Category keys are the string form of the numeric
/// task type (matching the wire parameter).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    categories: HashMap<String, CategorySnapshot>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last-observed tasks for a category, `None` if never seen.
    pub fn category(&self, category: u32) -> Option<&CategorySnapshot> {
        self.categories.get(&category.to_string())
    }

    /// Replace a category's snapshot with a fresh fetch result.
    ///
    /// Items absent from `fresh` drop out of tracking; this is the full
    /// replacement step that follows diffing.
    pub fn replace_category(&mut self, category: u32, fresh: &[TaskRecord]) {
        let entries = fresh
            .iter()
            .map(|t| (t.id.clone(), t.clone()))
            .collect::<CategorySnapshot>();
        self.categories.insert(category.to_string(), entries);
    }

    /// Number of tracked categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of tracked tasks in one category.
    pub fn task_count(&self, category: u32) -> usize {
        self.categories
            .get(&category.to_string())
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            name: format!("Task {id}"),
            platform: "App".into(),
            reward: "100".into(),
            remaining_slots: 1,
            remaining_days: 1,
            valid_from: "".into(),
            valid_until: "".into(),
        }
    }

    #[test]
    fn unseen_category_is_absent() {
        let snapshot = Snapshot::new();
        assert!(snapshot.category(2).is_none());
        assert_eq!(snapshot.task_count(2), 0);
    }

    #[test]
    fn replace_drops_absent_items() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_category(2, &[task("A"), task("B")]);
        assert_eq!(snapshot.task_count(2), 2);

        snapshot.replace_category(2, &[task("A")]);
        let cat = snapshot.category(2).unwrap();
        assert!(cat.contains_key("A"));
        assert!(!cat.contains_key("B"));
    }

    #[test]
    fn categories_are_independent() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_category(2, &[task("A")]);
        snapshot.replace_category(3, &[task("A"), task("B")]);

        assert_eq!(snapshot.task_count(2), 1);
        assert_eq!(snapshot.task_count(3), 2);
        assert_eq!(snapshot.category_count(), 2);
    }

    #[test]
    fn serializes_with_category_keys_at_top_level() {
        let mut snapshot = Snapshot::new();
        snapshot.replace_category(2, &[task("A")]);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("2").is_some());
        assert!(json["2"].get("A").is_some());

        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.task_count(2), 1);
    }
}
