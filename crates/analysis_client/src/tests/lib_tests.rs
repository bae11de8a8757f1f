use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::{
    validate_upload, AnalysisClient, AnalysisEndpoints, AnalysisError, AnalysisKind, ImageUpload,
    MAX_IMAGE_BYTES,
};

async fn accept_upload(mut multipart: Multipart) -> Json<Value> {
    let mut field = String::new();
    let mut filename = String::new();
    let mut size = 0;
    while let Some(part) = multipart.next_field().await.expect("multipart field") {
        field = part.name().unwrap_or_default().to_string();
        filename = part.file_name().unwrap_or_default().to_string();
        size = part.bytes().await.expect("field bytes").len();
    }
    Json(json!({ "ok": true, "field": field, "filename": filename, "size": size }))
}

async fn reject_upload(_multipart: Multipart) -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "upstream model unavailable")
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/process")
}

fn upload(filename: &str, mime: Option<&str>, bytes: Vec<u8>) -> ImageUpload {
    ImageUpload {
        filename: filename.to_string(),
        mime_type: mime.map(str::to_string),
        bytes,
    }
}

#[tokio::test]
async fn uploads_image_as_multipart_file_field_and_returns_json_verbatim() {
    let url = spawn_server(Router::new().route("/process", post(accept_upload))).await;
    let endpoints =
        AnalysisEndpoints::from_urls(&url, &url).expect("endpoints from test server url");
    let client = AnalysisClient::new(endpoints);

    let result = client
        .analyze(
            AnalysisKind::CoralHealth,
            upload("coral.jpg", Some("image/jpeg"), vec![0xFF, 0xD8, 0xFF, 0xE0]),
        )
        .await
        .expect("analysis result");

    assert_eq!(result["ok"], json!(true));
    assert_eq!(result["field"], json!("file"));
    assert_eq!(result["filename"], json!("coral.jpg"));
    assert_eq!(result["size"], json!(4));
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let url = spawn_server(Router::new().route("/process", post(reject_upload))).await;
    let endpoints =
        AnalysisEndpoints::from_urls(&url, &url).expect("endpoints from test server url");
    let client = AnalysisClient::new(endpoints);

    let err = client
        .analyze(
            AnalysisKind::DebrisDetection,
            upload("reef.png", Some("image/png"), vec![1, 2, 3]),
        )
        .await
        .expect_err("status error");

    match err {
        AnalysisError::Status { status, body } => {
            assert_eq!(status, 502);
            assert!(body.contains("upstream model unavailable"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn oversized_uploads_are_rejected_before_any_network_io() {
    // Unroutable endpoint: if validation did not short-circuit, the request
    // itself would error differently.
    let endpoints = AnalysisEndpoints::from_urls(
        "http://127.0.0.1:1/process",
        "http://127.0.0.1:1/process",
    )
    .expect("endpoints");
    let client = AnalysisClient::new(endpoints);

    let err = client
        .analyze(
            AnalysisKind::CoralHealth,
            upload("huge.jpg", Some("image/jpeg"), vec![0; MAX_IMAGE_BYTES + 1]),
        )
        .await
        .expect_err("size error");

    assert!(matches!(
        err,
        AnalysisError::TooLarge { actual, limit }
            if actual == MAX_IMAGE_BYTES + 1 && limit == MAX_IMAGE_BYTES
    ));
}

#[test]
fn validation_accepts_images_by_extension_or_declared_mime() {
    assert!(validate_upload(&upload("coral.JPG", None, vec![0; 16])).is_ok());
    assert!(validate_upload(&upload("coral.webp", None, vec![0; 16])).is_ok());
    assert!(validate_upload(&upload("capture", Some("image/png"), vec![0; 16])).is_ok());

    let err = validate_upload(&upload("notes.txt", None, vec![0; 16])).expect_err("not an image");
    assert!(matches!(err, AnalysisError::UnsupportedImage(name) if name == "notes.txt"));
}

#[test]
fn default_endpoints_parse_and_kinds_have_labels() {
    let endpoints = AnalysisEndpoints::default();
    assert_eq!(
        endpoints.url_for(AnalysisKind::CoralHealth).scheme(),
        "https"
    );
    assert_ne!(
        endpoints.url_for(AnalysisKind::CoralHealth).as_str(),
        endpoints.url_for(AnalysisKind::DebrisDetection).as_str()
    );
    assert_eq!(AnalysisKind::CoralHealth.label(), "Coral Health Check");
    assert_eq!(AnalysisKind::DebrisDetection.label(), "Detect Debris");
}
