//! GEOROC API Gateway
//!
//! The entry point for all external read requests.
//! Handles:
//! - Access-key authentication
//! - Request routing under /api/v1
//! - Observability (structured logging, request ids)

mod handlers;
mod middleware;

use axum::{routing::get, Router};
use georoc_common::{
    config::AppConfig,
    db::DbPool,
    secrets::{self, AccessKeyStore},
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub keys: Arc<AccessKeyStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_filter))
        .with_target(true)
        .init();

    info!("Starting GEOROC API Gateway v{}", georoc_common::VERSION);

    // Read the secret file once for the database credentials; access keys
    // go through the TTL store so rotations apply without a restart
    let secret_map = secrets::load_secret_file(Path::new(&config.auth.secret_file))?;
    let keys = Arc::new(AccessKeyStore::new(
        config.auth.secret_file.clone(),
        Duration::from_secs(config.auth.key_cache_ttl_secs),
    ));

    let config = Arc::new(config);

    // Initialize database connection
    let db = DbPool::new(&config.database, &secret_map).await?;
    let version = db.ping().await?;
    info!(version = %version, "Database reachable");

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        keys,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Everything except the liveness probe requires the access key
    let protected = Router::new()
        // Catalog queries
        .route("/queries/authors", get(handlers::authors::list_authors))
        .route(
            "/queries/authors/{personID}",
            get(handlers::authors::get_author),
        )
        .route(
            "/queries/citations",
            get(handlers::citations::list_citations),
        )
        .route(
            "/queries/citations/{citationID}",
            get(handlers::citations::get_citation),
        )
        .route("/queries/sites", get(handlers::sites::list_sites))
        .route("/queries/sites/settings", get(handlers::sites::list_settings))
        .route(
            "/queries/sites/{samplingfeatureID}",
            get(handlers::sites::get_site),
        )
        .route("/queries/samples", get(handlers::samples::list_samples))
        .route(
            "/queries/fullData/{identifier}",
            get(handlers::fulldata::get_fulldata),
        )
        .route(
            "/queries/results/elements",
            get(handlers::results::list_elements),
        )
        .route(
            "/queries/results/elementtypes",
            get(handlers::results::list_element_types),
        )
        .route(
            "/queries/statistics",
            get(handlers::statistics::get_statistics),
        )
        // Map view
        .route("/geodata/sites", get(handlers::geodata::list_sites))
        // Tabular export
        .route("/download/{format}", get(handlers::download::download))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::access_key_auth,
        ));

    let public = Router::new()
        .route("/ping", get(handlers::ping::ping))
        .route("/docs", get(handlers::docs::ui))
        .route("/docs/openapi.yaml", get(handlers::docs::openapi_document));

    // Compose the app
    Router::new()
        .nest("/api/v1", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
