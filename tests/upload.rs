use axum::{body::to_bytes, http::Request, Router};
use serde_json::Value;
use trackreplay_rs::{config::Config, routes, state::AppState};
use tower::ServiceExt;

fn app() -> Router {
    let config = Config::from_env();
    let state = AppState::new(config);
    routes::router().with_state(state)
}

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>Test Ride</name><trkseg>
    <trkpt lat="52.5200" lon="13.4050"><ele>34.0</ele><time>2026-01-01T12:00:00Z</time><extensions><gpxtpx:hr>140</gpxtpx:hr></extensions></trkpt>
    <trkpt lat="52.5205" lon="13.4060"><ele>39.0</ele><time>2026-01-01T12:00:10Z</time><extensions><gpxtpx:hr>145</gpxtpx:hr></extensions></trkpt>
  </trkseg></trk>
</gpx>"#
}

fn multipart_body(file_name: &str, file_body: &str, boundary: &str) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

async fn upload(file_name: &str, file_body: &str) -> (axum::http::StatusCode, Vec<u8>) {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body(file_name, file_body, boundary);

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/upload")
                .method("POST")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(axum::body::Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, body.to_vec())
}

#[tokio::test]
async fn upload_gpx_returns_track_id_and_metrics() {
    let (status, body) = upload("ride.gpx", sample_gpx()).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert!(json["track_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(json["name"], "Test Ride");
    assert_eq!(json["usable"], true);
    assert_eq!(json["synthetic_timing"], false);
    assert_eq!(json["point_count"], 2);
    assert_eq!(json["metrics"]["elevation_gain_m"], 5.0);
    assert_eq!(json["metrics"]["max_heart_rate"], 145);
}

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let (status, _) = upload("ride.txt", "hello").await;
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_gpx_is_stored_as_unusable() {
    let (status, body) = upload("broken.gpx", "<gpx><trk>").await;

    assert_eq!(status, axum::http::StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["usable"], false);
    assert_eq!(json["point_count"], 0);
    assert_eq!(json["name"], "broken");
    assert!(json["notices"].as_array().is_some_and(|n| !n.is_empty()));
}
