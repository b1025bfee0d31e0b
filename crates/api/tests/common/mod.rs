#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use vto_api::config::ServerConfig;
use vto_api::routes;
use vto_api::state::AppState;
use vto_batch::{BatchCoordinator, CoordinatorConfig};
use vto_core::invoker::{TryOnFailure, TryOnImage, TryOnInvoker};
use vto_core::naming::person_image_filename;

/// Minimal JPEG payload produced by the mock invoker.
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

/// Mock invoker that always succeeds after an optional delay.
pub struct MockInvoker {
    pub delay: Duration,
}

impl MockInvoker {
    pub fn instant() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TryOnInvoker for MockInvoker {
    async fn try_on(
        &self,
        _person_image: &Path,
        _garment_image: &Path,
        _sample_count: u8,
    ) -> Result<TryOnImage, TryOnFailure> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(TryOnImage {
            jpeg: FAKE_JPEG.to_vec(),
        })
    }
}

/// A router plus the temp directories backing it. Keep the struct alive
/// for the duration of the test; dropping it deletes the directories.
pub struct TestApp {
    pub router: Router,
    pub uploads_dir: TempDir,
    pub garments_dir: TempDir,
    pub results_dir: TempDir,
}

/// Build a test `ServerConfig` over the given temp directories.
pub fn test_config(uploads: &Path, garments: &Path, results: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        uploads_dir: uploads.to_path_buf(),
        garments_dir: garments.to_path_buf(),
        results_dir: results.to_path_buf(),
        max_workers: 3,
    }
}

/// Build the full application router with all middleware layers, using
/// the given invoker.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(invoker: Arc<dyn TryOnInvoker>) -> TestApp {
    let uploads_dir = tempfile::tempdir().expect("uploads tempdir");
    let garments_dir = tempfile::tempdir().expect("garments tempdir");
    let results_dir = tempfile::tempdir().expect("results tempdir");

    let config = test_config(uploads_dir.path(), garments_dir.path(), results_dir.path());

    let coordinator = Arc::new(BatchCoordinator::new(
        Arc::clone(&invoker),
        CoordinatorConfig::new(&config.results_dir),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        coordinator,
        invoker,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .nest_service("/garments", ServeDir::new(&config.garments_dir))
        .nest_service("/results", ServeDir::new(&config.results_dir))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
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

    TestApp {
        router,
        uploads_dir,
        garments_dir,
        results_dir,
    }
}

/// Write a fake person image for the given session id.
pub fn seed_person_image(app: &TestApp, session_id: &str) {
    std::fs::write(
        app.uploads_dir.path().join(person_image_filename(session_id)),
        FAKE_JPEG,
    )
    .expect("seed person image");
}

/// Populate the garment catalog with empty files of the given names.
pub fn seed_garments(app: &TestApp, names: &[&str]) {
    for name in names {
        std::fs::write(app.garments_dir.path().join(name), FAKE_JPEG).expect("seed garment");
    }
}

// ---- request helpers ----

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid JSON body")
}
