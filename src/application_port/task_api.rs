use super::ApiResult;
use crate::domain_model::{TaskHandle, TaskId, TaskStatusReport};

#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /api/email-task-status/{id}/`
    async fn task_status(&self, id: &TaskId) -> ApiResult<TaskStatusReport>;
    /// `POST /api/test-celery/`
    async fn trigger_test_task(&self) -> ApiResult<TaskHandle>;
    /// `POST /api/send-test-email/`
    async fn send_test_email(&self, email: &str) -> ApiResult<TaskHandle>;
}
