use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single tracked task.
///
/// Serialized field names are camelCase so the `todo`/`completed`
/// blobs keep the shape older versions wrote. The `id` gives tasks a
/// stable identity independent of list position; blobs written before
/// it existed get a fresh one on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique ID for internal references
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Task text (non-empty, trimmed)
    pub text: String,
    /// Whether the task is marked completed
    #[serde(default)]
    pub completed: bool,
    /// Whether this task has contributed XP to the ledger
    #[serde(default)]
    pub xp_awarded: bool,
    /// When the task was completed (absent while active)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Local>>,
}

impl Task {
    /// Create a task from raw input. Returns `None` when the text
    /// trims to empty.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            text: trimmed.to_string(),
            completed: false,
            xp_awarded: false,
            completed_at: None,
        })
    }

    /// Replace the text. Returns false (text unchanged) when the new
    /// text trims to empty.
    pub fn rename(&mut self, new_text: &str) -> bool {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.text = trimmed.to_string();
        true
    }

    /// Mark completed, stamping the completion time.
    pub fn complete(&mut self) {
        self.completed = true;
        self.completed_at = Some(Local::now());
    }

    /// Reset to an active, unawarded state (used by restore).
    pub fn reopen(&mut self) {
        self.completed = false;
        self.xp_awarded = false;
        self.completed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_text() {
        let task = Task::new("  Buy milk  ").unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(!task.xp_awarded);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_new_rejects_blank_text() {
        assert!(Task::new("").is_none());
        assert!(Task::new("   \t ").is_none());
    }

    #[test]
    fn test_rename() {
        let mut task = Task::new("Old").unwrap();
        assert!(task.rename("  New  "));
        assert_eq!(task.text, "New");

        assert!(!task.rename("   "));
        assert_eq!(task.text, "New");
    }

    #[test]
    fn test_complete_and_reopen() {
        let mut task = Task::new("Test").unwrap();
        task.complete();
        task.xp_awarded = true;
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        task.reopen();
        assert!(!task.completed);
        assert!(!task.xp_awarded);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let task = Task::new("Test").unwrap();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"xpAwarded\""));
        assert!(!json.contains("completedAt")); // absent while active
    }

    #[test]
    fn test_deserializes_legacy_blob_without_id() {
        let json = r#"{"text":"Buy milk","completed":true,"xpAwarded":true}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(task.completed);
        assert!(task.xp_awarded);
        assert!(task.completed_at.is_none());
    }
}
