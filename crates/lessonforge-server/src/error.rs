use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use lessonforge_core::error::QuizError;

/// An error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), "{}", self.message);
        } else {
            tracing::debug!(status = self.status.as_u16(), "{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonforge_core::error::ValidationIssue;

    #[test]
    fn status_by_error_kind() {
        assert_eq!(
            ApiError::from(QuizError::InvalidInput("x".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(QuizError::EmptyResponse).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let validation = ApiError::from(QuizError::Validation {
            issues: vec![ValidationIssue {
                index: 1,
                message: "correctAnswer is not one of the options".into(),
            }],
        });
        assert_eq!(validation.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(validation.message.contains("entry 1"));
    }
}
