use std::fmt;

use serde::{Deserialize, Serialize};

/// Body returned by every `POST /{endpoint}` call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTaskResponse {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Throttled,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Throttled => "THROTTLED",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }

    /// No further status change will happen.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a task as returned by `GET /tasks/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Output URLs; present once the task succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<String>,
    /// 0.0 – 1.0 while running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl Task {
    pub fn first_output(&self) -> Option<&str> {
        self.output.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_running_and_failed_snapshots() {
        let running: Task = serde_json::from_str(
            r#"{"id":"t","status":"RUNNING","createdAt":"2025-01-01T00:00:00Z","progress":0.4}"#,
        )
        .unwrap();
        assert_eq!(running.status, TaskStatus::Running);
        assert!(!running.status.is_terminal());
        assert_eq!(running.progress, Some(0.4));
        assert!(running.first_output().is_none());

        let failed: Task = serde_json::from_str(
            r#"{"id":"t","status":"FAILED","failure":"bad input","failureCode":"INPUT_PREPROCESSING.SAFETY"}"#,
        )
        .unwrap();
        assert!(failed.status.is_terminal());
        assert_eq!(failed.failure_code.as_deref(), Some("INPUT_PREPROCESSING.SAFETY"));
    }

    #[test]
    fn throttled_is_not_terminal() {
        assert!(!TaskStatus::Throttled.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
    }
}
