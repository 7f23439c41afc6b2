use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Worker ids are UUID-like; anything else could rewrite the request path.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Worker-side state as reported by the task-status endpoint.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Started,
    Success,
    Failure,
    /// RETRY, REVOKED and anything newer.
    #[serde(other)]
    Other,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Started => "STARTED",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
            TaskStatus::Other => "OTHER",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    BookingConfirmation,
    ConnectivityCheck,
    TestEmail,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskKind::BookingConfirmation => "booking confirmation",
            TaskKind::ConnectivityCheck => "connectivity check",
            TaskKind::TestEmail => "test email",
        };
        f.write_str(label)
    }
}

/// Body of `GET /api/email-task-status/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusReport {
    pub status: TaskStatus,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body returned by endpoints that enqueue a job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskHandle {
    pub task_id: TaskId,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTask {
    pub task_id: TaskId,
    pub kind: TaskKind,
    pub description: String,
    pub status: TaskStatus,
    pub ready: bool,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl BackgroundTask {
    pub fn submitted(task_id: TaskId, kind: TaskKind, description: impl Into<String>) -> Self {
        Self {
            task_id,
            kind,
            description: description.into(),
            status: TaskStatus::Pending,
            ready: false,
            result: None,
            error: None,
            created_at: Utc::now(),
            last_updated: None,
        }
    }

    /// A task is terminal once the worker says so; only non-terminal tasks are polled.
    pub fn needs_refresh(&self) -> bool {
        !self.ready
    }

    pub fn apply(&mut self, report: TaskStatusReport, at: DateTime<Utc>) {
        self.status = report.status;
        self.ready = report.ready;
        if report.result.is_some() {
            self.result = report.result;
        }
        if report.error.is_some() {
            self.error = report.error;
        }
        self.last_updated = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_ids_are_path_safe() {
        assert!(TaskId("3f9b1c2a-77e0-4d2b-9a51-0c1d2e3f4a5b".to_string()).is_path_safe());
        assert!(TaskId("fake_task-1".to_string()).is_path_safe());
        for bad in ["", "a/b", "a?x=1", "..", "a b", "t%2F1"] {
            assert!(!TaskId(bad.to_string()).is_path_safe(), "{bad}");
        }
    }

    #[test]
    fn report_tolerates_unknown_states() {
        let report: TaskStatusReport =
            serde_json::from_str(r#"{"status":"RETRY","ready":false}"#).unwrap();
        assert_eq!(report.status, TaskStatus::Other);

        let report: TaskStatusReport =
            serde_json::from_str(r#"{"status":"FAILURE","ready":true,"error":"smtp down"}"#)
                .unwrap();
        assert_eq!(report.status, TaskStatus::Failure);
        assert_eq!(report.error.as_deref(), Some("smtp down"));
    }

    #[test]
    fn apply_merges_and_stamps() {
        let mut task = BackgroundTask::submitted(
            TaskId("t-1".to_string()),
            TaskKind::TestEmail,
            "test email to ops",
        );
        assert!(task.needs_refresh());

        let at = Utc::now();
        task.apply(
            TaskStatusReport {
                status: TaskStatus::Success,
                ready: true,
                result: Some(serde_json::json!("sent")),
                error: None,
            },
            at,
        );
        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(task.last_updated, Some(at));
        assert_eq!(task.description, "test email to ops");
        assert!(!task.needs_refresh());
    }
}
