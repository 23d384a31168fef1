use std::net::SocketAddr;
use std::sync::Arc;
use tenderchain_api::config::Config;
use tenderchain_api::handlers::AppState;
use tenderchain_api::routes;
use tenderchain_api::scoring::HttpScorer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The remote scoring client.
/// - HTTP routes and middleware (CORS, body limit, rate limiting).
///
/// It then starts the Axum server and runs until Ctrl-C or SIGTERM.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server shuts down cleanly, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tenderchain_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let scorer = HttpScorer::new(config.scoring_service_url.clone(), config.scoring_timeout())
        .map_err(|e| anyhow::anyhow!("Failed to initialize scorer: {}", e))?;
    tracing::info!("✓ Scoring client initialized: {}", scorer.endpoint());

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        scorer: Arc::new(scorer),
    });

    // API routes get the size limit and rate limiting; liveness routes do not
    let api_routes = routes::api_routes(&config)?;

    let app = routes::build_app(app_state, api_routes)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer address is needed by the rate limiter's key extractor
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
