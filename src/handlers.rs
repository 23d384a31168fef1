use crate::config::Config;
use crate::errors::AppError;
use crate::models::{EvaluateRequest, EvaluateResponse, StatusResponse};
use crate::scoring::Scorer;
use axum::{extract::FromRequest, extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Scoring function every evaluation is forwarded to.
    pub scorer: Arc<dyn Scorer>,
}

/// JSON body extractor whose rejections render as [`AppError`].
///
/// Shape errors (missing `bidData`, non-object value) come out as `422`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidatedJson<T>(pub T);

/// GET /
///
/// Liveness check. Always answers `{"status": "API running"}`.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "API running".to_string(),
    })
}

/// Health check endpoint.
///
/// Returns the service status, name and version.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/evaluate
///
/// Forwards the bid to the scorer and wraps whatever it returns in the
/// success envelope. The body has already been validated by the time this
/// runs, so the scorer only ever sees JSON objects.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - Request body containing the `bidData` object.
///
/// # Returns
///
/// * `Result<Json<EvaluateResponse>, AppError>` - `{"success": true, "score": ...}` or an error envelope.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let evaluation_id = Uuid::new_v4();
    let bid = request.bid_data;

    tracing::info!(
        %evaluation_id,
        fields = bid.len(),
        "POST /api/evaluate - scoring bid"
    );

    let score = state.scorer.score(&bid).await.map_err(|e| {
        tracing::warn!(%evaluation_id, "Evaluation failed: {}", e);
        AppError::from(e)
    })?;

    tracing::info!(%evaluation_id, "Evaluation complete, score: {}", score);

    Ok(Json(EvaluateResponse::scored(score)))
}
