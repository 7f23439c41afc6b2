use crate::domain_port::StoreError;
use serde::Serialize;
use serde_json::Value;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("session expired, please log in again")]
    SessionExpired,
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("{message}")]
    Validation {
        status: Option<u16>,
        message: String,
        detail: Option<Value>,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("local storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    InvalidCredentials,
    SessionExpired,
    Unauthorized,
    Forbidden,
    Validation,
    NotFound,
    Server,
    Unexpected,
    Decode,
    Storage,
}

impl ApiError {
    /// Normalizes a non-success HTTP answer.
    pub fn from_status(status: u16, body: &str) -> ApiError {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| fallback_message(status, body));

        match status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            400..=499 => ApiError::Validation {
                status: Some(status),
                message,
                detail: parsed,
            },
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unexpected { status, message },
        }
    }

    pub fn validation(message: impl Into<String>) -> ApiError {
        ApiError::Validation {
            status: None,
            message: message.into(),
            detail: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::SessionExpired => ErrorKind::SessionExpired,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Unexpected { .. } => ErrorKind::Unexpected,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) | ApiError::SessionExpired => {
                Some(401)
            }
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Validation { status, .. } => *status,
            ApiError::Server { status, .. } | ApiError::Unexpected { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Storage(_) => None,
        }
    }

    /// Authentication problems send the user back to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::SessionExpired | ApiError::InvalidCredentials | ApiError::Unauthorized(_)
        )
    }

    /// Transport hiccups and 5xx answers are worth retrying later.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }

    /// The message the service itself provided, if any.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::Unauthorized(message) => Some(message.as_str()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    pub fn detail_or(&self, fallback: &str) -> String {
        self.server_detail().unwrap_or(fallback).to_string()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Storage(error.to_string())
    }
}

/// Pulls a human-readable message out of a REST framework error body.
pub fn server_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(server_message),
        Value::Object(map) => {
            for key in ["detail", "error", "message", "non_field_errors"] {
                if let Some(message) = map.get(key).and_then(server_message) {
                    return Some(message);
                }
            }
            map.iter().find_map(|(field, value)| {
                server_message(value).map(|message| format!("{}: {}", field, message))
            })
        }
        _ => None,
    }
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('<') {
        format!("request failed with status {}", status)
    } else {
        body.chars().take(200).collect()
    }
}
