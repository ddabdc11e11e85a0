//! API error types with `{error: message}` JSON bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::{AnalysisFailure, FailureKind};
use crate::feedback::FeedbackError;

/// Error response body, the same shape for every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    RateLimited(String),
    #[error("{0}")]
    PaymentRequired(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::RateLimited(m)
            | ApiError::PaymentRequired(m)
            | ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m) => m,
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<AnalysisFailure> for ApiError {
    fn from(failure: AnalysisFailure) -> Self {
        match failure.kind {
            FailureKind::RateLimited => ApiError::RateLimited(failure.message),
            FailureKind::PaymentRequired => ApiError::PaymentRequired(failure.message),
            FailureKind::Internal => ApiError::Internal(failure.message),
        }
    }
}

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::EmptyMessage | FeedbackError::MissingEmail => {
                ApiError::BadRequest(err.to_string())
            }
            FeedbackError::NotFound(_) => ApiError::NotFound(err.to_string()),
            FeedbackError::Database(_) | FeedbackError::LockPoisoned => {
                tracing::error!(error = %err, "Feedback store error");
                ApiError::Internal("An internal error occurred".into())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn rate_limited_returns_429() {
        let failure = AnalysisFailure {
            kind: FailureKind::RateLimited,
            message: "Rate limit exceeded. Please try again later.".into(),
        };
        let response = ApiError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Rate limit exceeded. Please try again later.");
    }

    #[tokio::test]
    async fn payment_required_returns_402() {
        let failure = AnalysisFailure {
            kind: FailureKind::PaymentRequired,
            message: "Payment required.".into(),
        };
        let response = ApiError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn internal_keeps_message() {
        let response = ApiError::from(AnalysisFailure::internal("AI gateway error")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "AI gateway error");
    }

    #[tokio::test]
    async fn feedback_errors_map_to_client_statuses() {
        let empty = ApiError::from(FeedbackError::EmptyMessage).into_response();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
        let missing = ApiError::from(FeedbackError::NotFound(uuid::Uuid::nil())).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_errors_hide_details() {
        let response = ApiError::from(FeedbackError::LockPoisoned).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "An internal error occurred");
    }
}
