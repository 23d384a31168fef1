use crate::config::Config;
use crate::errors::AppError;
use crate::handlers::{self, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Routes nested under `/api`.
pub fn evaluation_routes() -> Router<Arc<AppState>> {
    Router::new().route("/evaluate", post(handlers::evaluate))
}

/// `/api` routes with their protection layers: per-IP rate limiting and a
/// body size cap.
///
/// The size cap is enforced by the JSON extractor, so oversized bodies come
/// back as a `413` in the usual error envelope. The limiter's own `429` is
/// rewritten into the same envelope.
pub fn api_routes(config: &Config) -> anyhow::Result<Router<Arc<AppState>>> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(config.rate_limit_replenish_ns())
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    Ok(evaluation_routes().layer(
        ServiceBuilder::new()
            .layer(middleware::map_response(rate_limit_envelope))
            .layer(GovernorLayer {
                config: governor_conf,
            })
            .layer(DefaultBodyLimit::max(config.max_body_bytes)),
    ))
}

async fn rate_limit_envelope(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let retry_after = response.headers().get(header::RETRY_AFTER).cloned();
    let mut envelope = AppError::RateLimited.into_response();
    if let Some(value) = retry_after {
        envelope.headers_mut().insert(header::RETRY_AFTER, value);
    }
    envelope
}

/// CORS policy: the configured origins only, any method, any header,
/// credentials allowed.
///
/// Credentialed CORS forbids `*`, so methods and headers are mirrored from
/// the preflight request instead.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin header '{}': {}", o, e))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Builds the full application.
///
/// `api` is the router mounted at `/api`: [`api_routes`] in production, bare
/// [`evaluation_routes`] where rate limiting is unwanted. The liveness routes
/// sit outside those layers.
pub fn build_app(state: Arc<AppState>, api: Router<Arc<AppState>>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors_allowed_origins)?;

    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
