use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vto_api::config::ServerConfig;
use vto_api::{routes, state::AppState};
use vto_batch::{BatchCoordinator, CoordinatorConfig};
use vto_core::invoker::TryOnInvoker;
use vto_vertex::client::TryOnClient;
use vto_vertex::config::VertexConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vto_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Image directories ---
    for dir in [&config.uploads_dir, &config.results_dir] {
        std::fs::create_dir_all(dir).expect("Failed to create image directory");
    }

    // --- Vertex try-on client ---
    let vertex_config = VertexConfig::from_env();
    let invoker: Arc<dyn TryOnInvoker> = Arc::new(
        TryOnClient::new(&vertex_config).expect("Failed to build Vertex try-on client"),
    );

    // --- Batch coordinator ---
    let mut coordinator_config = CoordinatorConfig::new(&config.results_dir);
    coordinator_config.max_workers = config.max_workers;
    let coordinator = Arc::new(BatchCoordinator::new(
        Arc::clone(&invoker),
        coordinator_config,
    ));
    tracing::info!(max_workers = config.max_workers, "Batch coordinator created");

    // --- CORS ---
    let cors = build_cors_layer(&config);

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        coordinator: Arc::clone(&coordinator),
        invoker,
    };

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        // Health check stays at root level, outside /api/v1.
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        // Image directories are served as static files.
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .nest_service("/garments", ServeDir::new(&config.garments_dir))
        .nest_service("/results", ServeDir::new(&config.results_dir))
        // Middleware, applied bottom-up: request id is set first, then
        // tracing, timeout, and panic recovery wrap the handlers.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Give in-flight batch runs a window to drain.
    coordinator.shutdown().await;
    tracing::info!("Batch coordinator shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Resolve when the process receives SIGINT or, on Unix, SIGTERM.
///
/// Either signal starts the graceful shutdown sequence, so the server
/// drains cleanly under Ctrl-C as well as under a process manager.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, starting graceful shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
    }
}

/// Build the CORS middleware layer from server configuration.
///
/// An unparseable origin panics at startup; misconfiguration should
/// fail fast rather than silently serve a half-open policy.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
