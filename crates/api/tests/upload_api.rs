//! Integration tests for the person image upload route.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, MockInvoker, TestApp};
use tower::ServiceExt;

const BOUNDARY: &str = "vto-test-boundary";

/// A small valid PNG to upload.
fn sample_png() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

/// Build a multipart request carrying one `user_image` part.
fn multipart_request(filename: &str, content_type: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"user_image\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/uploads")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> axum::response::Response {
    app.router.clone().oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Test: a valid upload is stored as the session's person image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_upload_is_stored_as_jpeg() {
    let app = build_test_app(Arc::new(MockInvoker::instant()));

    let response = send(&app, multipart_request("me.png", "image/png", &sample_png())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let session_id = json["session_id"].as_str().unwrap();
    let filename = json["filename"].as_str().unwrap();
    assert_eq!(filename, format!("{session_id}_user.jpg"));

    // The stored file decodes as a JPEG.
    let stored = std::fs::read(app.uploads_dir.path().join(filename)).unwrap();
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!(decoded.width(), 8);
}

// ---------------------------------------------------------------------------
// Test: camera captures with a `blob` filename are accepted by type
// ---------------------------------------------------------------------------

#[tokio::test]
async fn camera_capture_blob_filename_is_accepted() {
    let app = build_test_app(Arc::new(MockInvoker::instant()));

    let response = send(&app, multipart_request("blob", "image/jpeg", &sample_png())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: non-image uploads are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let app = build_test_app(Arc::new(MockInvoker::instant()));

    let response = send(
        &app,
        multipart_request("notes.txt", "text/plain", b"not an image"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: an image-named part with undecodable bytes is a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn undecodable_image_is_rejected() {
    let app = build_test_app(Arc::new(MockInvoker::instant()));

    let response = send(
        &app,
        multipart_request("me.jpg", "image/jpeg", b"garbage bytes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: a multipart body without the expected field is a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_field_is_rejected() {
    let app = build_test_app(Arc::new(MockInvoker::instant()));

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/uploads")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
