use super::RestApi;
use crate::application_port::*;
use crate::domain_model::{TaskHandle, TaskId, TaskStatusReport};
use crate::infra::ApiRequest;
use serde_json::json;

#[async_trait::async_trait]
impl TaskApi for RestApi {
    async fn task_status(&self, id: &TaskId) -> ApiResult<TaskStatusReport> {
        if !id.is_path_safe() {
            return Err(ApiError::validation(format!("not a task id: {:?}", id.0)));
        }
        self.http
            .send(ApiRequest::get(format!("/api/email-task-status/{}/", id)))
            .await
    }

    async fn trigger_test_task(&self) -> ApiResult<TaskHandle> {
        self.http.send(ApiRequest::post("/api/test-celery/")).await
    }

    async fn send_test_email(&self, email: &str) -> ApiResult<TaskHandle> {
        if !email.contains('@') {
            return Err(ApiError::validation(format!("not an email address: {}", email)));
        }
        let request = ApiRequest::post("/api/send-test-email/").json(&json!({ "email": email }))?;
        self.http.send(request).await
    }
}
