use crate::application_port::{ApiError, ApiResponse, ApiResult, server_message};
use crate::domain_model::CreatedBooking;
use serde::Serialize;
use tracing::warn;

pub const BOOKING_FAILED: &str = "Booking could not be created";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

impl From<Outcome> for std::process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => std::process::ExitCode::SUCCESS,
            Outcome::Failed => std::process::ExitCode::FAILURE,
        }
    }
}

/// Text of the error notice: the server's own detail when it sent one.
pub fn error_text(error: &ApiError, fallback: &str) -> String {
    let text = match error {
        ApiError::Validation {
            status: None,
            message,
            ..
        } => message.clone(),
        ApiError::Validation { detail, .. } => detail
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| fallback.to_string()),
        ApiError::Forbidden(_) | ApiError::NotFound(_) => error.detail_or(fallback),
        _ => format!("{}: {}", fallback, error),
    };
    if error.requires_login() {
        format!("{} (run `stayline login` to sign in)", text)
    } else {
        text
    }
}

pub fn show_error(error: &ApiError, fallback: &str) {
    warn!(kind = ?error.kind(), error = %error, "{}", fallback);
    eprintln!("error: {}", error_text(error, fallback));
}

pub fn show_info(message: &str) {
    eprintln!("{}", message);
}

/// Notice shown after a booking is created; nothing when no e-mail job was queued.
pub fn booking_notice(created: &CreatedBooking) -> Option<String> {
    created
        .email_task_id
        .as_ref()
        .map(|id| format!("Confirmation e-mail queued (task {})", id))
}

/// Prints `result` either as the JSON envelope or through `human`.
pub fn render<T: Serialize>(
    json: bool,
    result: ApiResult<T>,
    fallback: &str,
    human: impl FnOnce(&T),
) -> Outcome {
    if json {
        let outcome = match result {
            Ok(_) => Outcome::Done,
            Err(_) => Outcome::Failed,
        };
        print_json(&ApiResponse::from(result));
        return outcome;
    }
    match result {
        Ok(data) => {
            human(&data);
            Outcome::Done
        }
        Err(e) => {
            show_error(&e, fallback);
            Outcome::Failed
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => warn!(error = %e, "could not encode output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::TaskId;

    fn created(task: Option<&str>) -> CreatedBooking {
        let body = serde_json::json!({
            "booking_id": "7f0c7d36-3f55-4c52-9a5c-2d3f2c8c2a01",
            "property_id": "0b6b7b0e-6a8c-4f3e-9f61-2f7d7f1c5b11",
            "start_date": "2025-06-01",
            "end_date": "2025-06-04",
            "total_price": "300.00",
            "status": "pending",
            "task_id": task,
        });
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn booking_notice_only_when_a_task_was_queued() {
        assert_eq!(booking_notice(&created(None)), None);

        let with_task = created(Some("c1e2"));
        assert_eq!(with_task.email_task_id, Some(TaskId("c1e2".to_string())));
        assert_eq!(
            booking_notice(&with_task).as_deref(),
            Some("Confirmation e-mail queued (task c1e2)")
        );
    }

    #[test]
    fn server_detail_wins_over_fallback() {
        let err = ApiError::from_status(400, r#"{"detail":"Property is not available"}"#);
        assert_eq!(error_text(&err, BOOKING_FAILED), "Property is not available");

        let err = ApiError::from_status(400, "");
        assert_eq!(error_text(&err, BOOKING_FAILED), BOOKING_FAILED);

        let err = ApiError::validation("End date must be after the start date");
        assert_eq!(error_text(&err, BOOKING_FAILED), "End date must be after the start date");
    }

    #[test]
    fn non_validation_errors_keep_the_fallback_prefix() {
        let err = ApiError::Server {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(error_text(&err, BOOKING_FAILED).starts_with(BOOKING_FAILED));
    }

    #[test]
    fn auth_failures_point_to_login() {
        let text = error_text(&ApiError::SessionExpired, "Could not load bookings");
        assert!(text.ends_with("(run `stayline login` to sign in)"));
    }

    #[test]
    fn render_reports_outcome() {
        assert_eq!(render(true, Ok(1u8), "x", |_| {}), Outcome::Done);
        let failed: ApiResult<u8> = Err(ApiError::NotFound("gone".to_string()));
        assert_eq!(render(false, failed, "x", |_| {}), Outcome::Failed);
    }
}
