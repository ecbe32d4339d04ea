//! Diff calculation for change notifications.
//!
//! Compares a category's previous snapshot against a freshly fetched task
//! list to identify new tasks and slot/day changes. Disappeared tasks are
//! not reported; they drop out when the category snapshot is replaced.

use crate::models::{CategorySnapshot, TaskRecord};

/// A tracked-field change on a task present in both snapshots.
///
/// Carries old and new values for both tracked fields even when only one
/// changed, so the notification shows the full counter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub name: String,
    pub old_slots: i64,
    pub new_slots: i64,
    pub old_days: i64,
    pub new_days: i64,
}

impl TaskUpdate {
    /// Render the change as a notification line.
    pub fn describe(&self) -> String {
        format!(
            "Slots: {}->{} | Days: {}->{}",
            self.old_slots, self.new_slots, self.old_days, self.new_days
        )
    }
}

/// Result of diffing one category.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Tasks whose id was not in the previous snapshot
    pub added: Vec<TaskRecord>,
    /// Tasks whose tracked counters changed
    pub updated: Vec<TaskUpdate>,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len()
    }
}

/// Calculate the diff between a previous category snapshot and fresh items.
///
/// Only `remaining_slots` and `remaining_days` are compared for update
/// detection; descriptive fields are treated as immutable.
pub fn calculate_diff(previous: &CategorySnapshot, fresh: &[TaskRecord]) -> DiffResult {
    let mut result = DiffResult::default();

    for task in fresh {
        match previous.get(&task.id) {
            None => result.added.push(task.clone()),
            Some(old) => {
                if old.remaining_slots != task.remaining_slots
                    || old.remaining_days != task.remaining_days
                {
                    result.updated.push(TaskUpdate {
                        name: task.name.clone(),
                        old_slots: old.remaining_slots,
                        new_slots: task.remaining_slots,
                        old_days: old.remaining_days,
                        new_days: task.remaining_days,
                    });
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snapshot;

    fn make_task(id: &str, slots: i64, days: i64) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            name: format!("Task {id}"),
            platform: "App".into(),
            reward: "100".into(),
            remaining_slots: slots,
            remaining_days: days,
            valid_from: "2026-08-01".into(),
            valid_until: "2026-08-31".into(),
        }
    }

    fn snapshot_of(tasks: &[TaskRecord]) -> CategorySnapshot {
        tasks.iter().map(|t| (t.id.clone(), t.clone())).collect()
    }

    #[test]
    fn addition_against_empty_snapshot() {
        let prev = CategorySnapshot::new();
        let fresh = vec![make_task("A", 5, 10)];

        let result = calculate_diff(&prev, &fresh);
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].id, "A");
        assert!(result.updated.is_empty());
    }

    #[test]
    fn slot_change_is_reported_with_both_fields() {
        let prev = snapshot_of(&[make_task("A", 5, 10)]);
        let fresh = vec![make_task("A", 3, 10)];

        let result = calculate_diff(&prev, &fresh);
        assert!(result.added.is_empty());
        assert_eq!(result.updated.len(), 1);

        let update = &result.updated[0];
        assert_eq!(update.old_slots, 5);
        assert_eq!(update.new_slots, 3);
        assert_eq!(update.old_days, 10);
        assert_eq!(update.new_days, 10);
        assert_eq!(update.describe(), "Slots: 5->3 | Days: 10->10");
    }

    #[test]
    fn day_change_alone_is_reported() {
        let prev = snapshot_of(&[make_task("A", 5, 10)]);
        let fresh = vec![make_task("A", 5, 9)];

        let result = calculate_diff(&prev, &fresh);
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].new_days, 9);
    }

    #[test]
    fn descriptive_field_change_is_ignored() {
        let mut old = make_task("A", 5, 10);
        old.reward = "100".into();
        let prev = snapshot_of(&[old]);

        let mut fresh_task = make_task("A", 5, 10);
        fresh_task.reward = "999".into();

        let result = calculate_diff(&prev, &[fresh_task]);
        assert!(!result.has_changes());
    }

    #[test]
    fn disappeared_task_is_not_reported() {
        let prev = snapshot_of(&[make_task("A", 5, 10), make_task("B", 2, 3)]);
        let fresh = vec![make_task("A", 5, 10)];

        let result = calculate_diff(&prev, &fresh);
        assert!(!result.has_changes());
        assert_eq!(result.change_count(), 0);
    }

    #[test]
    fn diff_is_idempotent_after_replacement() {
        let fresh = vec![make_task("A", 5, 10), make_task("B", 2, 3)];

        let first = calculate_diff(&CategorySnapshot::new(), &fresh);
        assert_eq!(first.added.len(), 2);

        // Replace the category as the cycle does, then diff the same items.
        let mut snapshot = Snapshot::new();
        snapshot.replace_category(2, &fresh);
        let second = calculate_diff(snapshot.category(2).unwrap(), &fresh);
        assert!(!second.has_changes());
    }

    #[test]
    fn mixed_additions_and_updates() {
        let prev = snapshot_of(&[make_task("A", 5, 10), make_task("B", 2, 3)]);
        let fresh = vec![
            make_task("A", 5, 10),
            make_task("B", 1, 3),
            make_task("C", 9, 9),
        ];

        let result = calculate_diff(&prev, &fresh);
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].id, "C");
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].new_slots, 1);
        assert_eq!(result.change_count(), 2);
    }
}
