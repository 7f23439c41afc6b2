use super::{ApiError, ApiResult, ErrorKind};
use serde::Serialize;

/// Uniform success/failure envelope handed to the view layer.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: &ApiError) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorBody::from(error)),
        }
    }
}

impl From<&ApiError> for ErrorBody {
    fn from(error: &ApiError) -> Self {
        ErrorBody {
            kind: error.kind(),
            status: error.status(),
            message: error.to_string(),
        }
    }
}

impl<T: Serialize> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(error) => ApiResponse::err(&error),
        }
    }
}
