use crate::application_port::*;
use crate::domain_model::*;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted task-status endpoint that counts how often each task is queried.
#[derive(Debug, Default)]
pub struct FakeTaskApi {
    reports: DashMap<TaskId, TaskStatusReport>,
    queries: DashMap<TaskId, usize>,
    submitted: AtomicUsize,
    latency: Duration,
}

impl FakeTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every status query is counted at once but answers only after `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn script(&self, id: &TaskId, status: TaskStatus, ready: bool) {
        self.reports.insert(
            id.clone(),
            TaskStatusReport {
                status,
                ready,
                result: None,
                error: None,
            },
        );
    }

    pub fn queries_for(&self, id: &TaskId) -> usize {
        self.queries.get(id).map(|count| *count.value()).unwrap_or(0)
    }

    pub fn total_queries(&self) -> usize {
        self.queries.iter().map(|entry| *entry.value()).sum()
    }

    fn next_handle(&self) -> TaskHandle {
        let n = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        let task_id = TaskId(format!("fake-task-{}", n));
        self.script(&task_id, TaskStatus::Pending, false);
        TaskHandle {
            task_id,
            message: None,
        }
    }
}

#[async_trait::async_trait]
impl TaskApi for FakeTaskApi {
    async fn task_status(&self, id: &TaskId) -> ApiResult<TaskStatusReport> {
        *self.queries.entry(id.clone()).or_insert(0) += 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.reports
            .get(id)
            .map(|report| report.value().clone())
            .ok_or_else(|| ApiError::NotFound(format!("task {}", id)))
    }

    async fn trigger_test_task(&self) -> ApiResult<TaskHandle> {
        Ok(self.next_handle())
    }

    async fn send_test_email(&self, email: &str) -> ApiResult<TaskHandle> {
        if !email.contains('@') {
            return Err(ApiError::validation(format!("not an email address: {}", email)));
        }
        Ok(self.next_handle())
    }
}
