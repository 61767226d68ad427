//! End-to-end tests for the submission and lookup endpoints, driven through
//! the full router against a SQLite file and a temporary upload directory.

use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use docintake::{ServerConfig, ServerState, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::routes::details::DetailsResponse;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "docintake-test-boundary";

struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(tweak: impl FnOnce(&mut ServerConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = ServerConfig {
            upload_dir: dir.path().join("uploads"),
            database_url: format!("sqlite://{}", dir.path().join("records.db").display()),
            ..ServerConfig::default()
        };
        tweak(&mut config);

        let state = ServerState::new(config).await.unwrap();
        Self {
            router: build_router(Arc::new(state)),
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn save_front(&self, number: &str, name: &str, image: Option<(&str, &[u8])>) -> (StatusCode, Value) {
        let fields = [
            ("name", name),
            ("dob", "1992-04-18"),
            ("gender", "F"),
            ("adharNumber", number),
        ];
        self.send_json(front_request(&fields, image)).await
    }

    async fn save_back(&self, number: &str, address: &str) -> (StatusCode, Value) {
        let request = Request::post("/saveBackDetails")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "address": address, "pincode": "560034", "reenterAdhar": number })
                    .to_string(),
            ))
            .unwrap();
        self.send_json(request).await
    }

    async fn details(&self, number: &str) -> (StatusCode, Value) {
        let request = Request::get(format!("/getAadharDetails/{number}"))
            .body(Body::empty())
            .unwrap();
        self.send_json(request).await
    }
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn front_request(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Request<Body> {
    Request::post("/saveUserDetails")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, image)))
        .unwrap()
}

#[tokio::test]
async fn front_with_image_records_stored_path() {
    let app = TestApp::new().await;
    let png = b"\x89PNG\r\n\x1a\nnot really a png";

    let (status, body) = app.save_front("111122223333", "Lakshmi", Some(("card.png", png))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User details saved successfully" }));

    let (status, _) = app.save_back("111122223333", "MG Road").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.details("111122223333").await;
    assert_eq!(status, StatusCode::OK);
    let details: DetailsResponse = serde_json::from_value(body).unwrap();
    let front = details.front_details.unwrap();
    assert_eq!(front.name, "Lakshmi");

    let image_path = front.image_path.expect("image path recorded");
    assert!(image_path.ends_with(".png"));
    assert_eq!(tokio::fs::read(&image_path).await.unwrap(), png);

    // The stored file is served back under /uploads.
    let file_name = Path::new(&image_path).file_name().unwrap().to_str().unwrap();
    let request = Request::get(format!("/uploads/{file_name}"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, png);
}

#[tokio::test]
async fn front_without_image_records_null_path() {
    let app = TestApp::new().await;

    let (status, _) = app.save_front("444455556666", "Kiran", None).await;
    assert_eq!(status, StatusCode::OK);
    app.save_back("444455556666", "Brigade Road").await;

    let (status, body) = app.details("444455556666").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["frontDetails"]["image_path"].is_null());
    assert_eq!(body["frontDetails"]["dob"], "1992-04-18");
    assert_eq!(body["frontDetails"]["adhar_number"], "444455556666");
}

#[tokio::test]
async fn back_details_accept_json_and_form() {
    let app = TestApp::new().await;

    let (status, body) = app.save_back("777788889999", "Church Street").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Back details saved successfully");

    let request = Request::post("/saveBackDetails")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "address=Residency+Road&pincode=560025&reenterAdhar=000011112222",
        ))
        .unwrap();
    let (status, _) = app.send_json(request).await;
    assert_eq!(status, StatusCode::OK);

    app.save_front("000011112222", "Noor", None).await;
    let (status, body) = app.details("000011112222").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backDetails"]["address"], "Residency Road");
    assert_eq!(body["backDetails"]["pincode"], "560025");
    assert_eq!(body["backDetails"]["reenter_adhar"], "000011112222");
}

#[tokio::test]
async fn unknown_number_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.details("999999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Aadhar details not found" }));
}

#[tokio::test]
async fn front_without_back_is_not_found() {
    let app = TestApp::new().await;
    app.save_front("123123123123", "Deepa", None).await;

    let (status, body) = app.details("123123123123").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Aadhar details not found");
}

#[tokio::test]
async fn back_without_front_is_not_found() {
    let app = TestApp::new().await;
    app.save_back("321321321321", "Anna Salai").await;

    let (status, _) = app.details("321321321321").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicates_collapse_to_first_rows() {
    let app = TestApp::new().await;
    app.save_front("555555555555", "Original", None).await;
    app.save_front("555555555555", "Duplicate", None).await;
    app.save_back("555555555555", "First address").await;
    app.save_back("555555555555", "Second address").await;

    let (status, body) = app.details("555555555555").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["frontDetails"].is_object());
    assert!(body["backDetails"].is_object());
    assert_eq!(body["frontDetails"]["name"], "Original");
    assert_eq!(body["backDetails"]["address"], "First address");
}

#[tokio::test]
async fn partial_lookup_allowed_when_configured() {
    let app = TestApp::with_config(|cfg| cfg.require_both = false).await;
    app.save_front("246824682468", "Partial", None).await;

    let (status, body) = app.details("246824682468").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frontDetails"]["name"], "Partial");
    assert!(body["backDetails"].is_null());

    let (status, _) = app.details("000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_form_field_is_bad_request() {
    let app = TestApp::new().await;

    let request = front_request(&[("name", "No Number"), ("dob", "2000-01-01"), ("gender", "M")], None);
    let (status, body) = app.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: adharNumber");

    let request = Request::post("/saveBackDetails")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"address": "Somewhere"}"#))
        .unwrap();
    let (status, body) = app.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: pincode");
}

#[tokio::test]
async fn non_multipart_front_is_json_bad_request() {
    let app = TestApp::new().await;

    let request = Request::post("/saveUserDetails")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "Wrong Encoding"}"#))
        .unwrap();
    let (status, body) = app.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn oversized_upload_is_payload_too_large() {
    let app = TestApp::with_config(|cfg| cfg.max_body_size_mb = 1).await;
    let image = vec![0u8; 2 * 1024 * 1024];

    let (status, body) = app.save_front("999988887777", "Big Scan", Some(("big.png", image.as_slice()))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "Payload too large" }));
}

#[tokio::test]
async fn text_image_field_is_not_an_upload() {
    let app = TestApp::new().await;

    let fields = [
        ("name", "Plain Text"),
        ("dob", "1985-07-09"),
        ("gender", "M"),
        ("adharNumber", "121234345656"),
        ("image", "not a file"),
    ];
    let (status, _) = app.send_json(front_request(&fields, None)).await;
    assert_eq!(status, StatusCode::OK);
    app.save_back("121234345656", "Residency Road").await;

    let (status, body) = app.details("121234345656").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["frontDetails"]["image_path"].is_null());
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = TestApp::new().await;

    let request = Request::get("/nope").body(Body::empty()).unwrap();
    let (status, body) = app.send_json(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn missing_upload_is_404() {
    let app = TestApp::new().await;

    let request = Request::get("/uploads/image-0-missing.png")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn probes_report_healthy() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app
        .send_json(Request::get("/ready").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["records"], "ready");

    // No recorder is installed in tests.
    let (status, _) = app
        .send(Request::get("/metrics").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::new().await;

    let request = Request::get("/health")
        .header("x-request-id", "trace-me-42")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-42");

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
