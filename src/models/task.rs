//! Task record data structure.

use serde::{Deserialize, Serialize};

/// One trackable task from the remote listing.
///
/// The wire payload carries more fields than we track; unknown fields are
/// ignored on deserialization. Only `remaining_slots` and `remaining_days`
/// participate in change detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    /// Stable identifier assigned by the source, unique within a category
    #[serde(rename = "taskId")]
    pub id: String,

    /// Task display name
    #[serde(rename = "taskName", default)]
    pub name: String,

    /// Publishing platform
    #[serde(rename = "platForm", default)]
    pub platform: String,

    /// Reward description (points string)
    #[serde(rename = "rewardScoreString", default)]
    pub reward: String,

    /// Remaining participation slots
    #[serde(rename = "taskSurplusNum")]
    pub remaining_slots: i64,

    /// Remaining days before the task closes
    #[serde(rename = "taskSurplusDay")]
    pub remaining_days: i64,

    /// Start of the validity window (display only)
    #[serde(rename = "taskBeginTime", default)]
    pub valid_from: String,

    /// End of the validity window (display only)
    #[serde(rename = "taskEndTime", default)]
    pub valid_until: String,
}

impl TaskRecord {
    /// Render the record as a multi-line notification block.
    pub fn describe(&self) -> String {
        format!(
            "Task: {}\nPlatform: {}\nReward: {}\nRemaining slots: {}\nRemaining days: {}\nValid: {} to {}",
            self.name,
            self.platform,
            self.reward,
            self.remaining_slots,
            self.remaining_days,
            self.valid_from,
            self.valid_until
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_wire_names() {
        let json = r#"{
            "taskId": "T100",
            "taskName": "Share a photo",
            "platForm": "App",
            "rewardScoreString": "200 points",
            "taskSurplusNum": 5,
            "taskSurplusDay": 10,
            "taskBeginTime": "2026-08-01",
            "taskEndTime": "2026-08-31",
            "somethingElse": true
        }"#;

        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "T100");
        assert_eq!(task.remaining_slots, 5);
        assert_eq!(task.remaining_days, 10);
        assert_eq!(task.platform, "App");
    }

    #[test]
    fn deserialize_missing_descriptive_fields() {
        let json = r#"{"taskId": "T1", "taskSurplusNum": 0, "taskSurplusDay": 1}"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.name, "");
        assert_eq!(task.reward, "");
    }

    #[test]
    fn describe_contains_all_display_fields() {
        let task = TaskRecord {
            id: "T1".into(),
            name: "Test drive".into(),
            platform: "App".into(),
            reward: "500".into(),
            remaining_slots: 3,
            remaining_days: 7,
            valid_from: "2026-08-01".into(),
            valid_until: "2026-09-01".into(),
        };

        let text = task.describe();
        assert!(text.contains("Test drive"));
        assert!(text.contains("Remaining slots: 3"));
        assert!(text.contains("2026-08-01 to 2026-09-01"));
    }
}
