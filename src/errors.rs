use crate::models::ErrorResponse;
use crate::scoring::ScoringError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Request body could not be extracted (bad JSON, wrong shape, wrong
    /// content type). Keeps the status the extractor chose.
    Rejected { status: StatusCode, message: String },
    /// The scorer refused the bid.
    InvalidBid(String),
    /// The scorer failed while computing a score.
    ScoringFailed(String),
    /// The scorer could not be reached.
    ScorerUnavailable(String),
    /// Per-client rate limit exceeded.
    RateLimited,
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Rejected { status, message } => {
                write!(f, "Request rejected ({}): {}", status, message)
            }
            AppError::InvalidBid(msg) => write!(f, "Invalid bid: {}", msg),
            AppError::ScoringFailed(msg) => write!(f, "Scoring failed: {}", msg),
            AppError::ScorerUnavailable(msg) => write!(f, "Scorer unavailable: {}", msg),
            AppError::RateLimited => write!(f, "Rate limit exceeded"),
        }
    }
}

impl AppError {
    /// HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Rejected { status, .. } => *status,
            AppError::InvalidBid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ScoringFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ScorerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Client-side errors echo their message; server-side errors are logged
    /// in full and answered with a generic message.
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::Rejected { message, .. } => {
                tracing::debug!("Request body rejected: {}", message);
                message
            }
            AppError::InvalidBid(msg) => {
                tracing::warn!("Bid rejected by scorer: {}", msg);
                msg
            }
            AppError::ScoringFailed(msg) => {
                tracing::error!("Scoring error: {}", msg);
                "Scoring failed".to_string()
            }
            AppError::ScorerUnavailable(msg) => {
                tracing::error!("Scorer unavailable: {}", msg);
                "Scoring service unavailable".to_string()
            }
            AppError::RateLimited => {
                tracing::warn!("Rate limit exceeded");
                "Too many requests".to_string()
            }
        };

        (status, Json(ErrorResponse::new(error_message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    /// Converts an axum body rejection into an `AppError`.
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ScoringError> for AppError {
    /// Converts a `ScoringError` into an `AppError`.
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidBid(msg) => AppError::InvalidBid(msg),
            ScoringError::Failed(msg) => AppError::ScoringFailed(msg),
            ScoringError::Unavailable(msg) => AppError::ScorerUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_scoring_error_status_mapping() {
        let cases = [
            (
                ScoringError::InvalidBid("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ScoringError::Failed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ScoringError::Unavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response =
            AppError::ScoringFailed("division by zero in weights".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Scoring failed");
    }

    #[tokio::test]
    async fn test_invalid_bid_echoes_message() {
        let response = AppError::InvalidBid("price must be positive".into()).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "price must be positive");
    }

    #[tokio::test]
    async fn test_rejection_keeps_status() {
        let response = AppError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_rate_limited_envelope() {
        let response = AppError::RateLimited.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"success": false, "error": "Too many requests"})
        );
    }
}
