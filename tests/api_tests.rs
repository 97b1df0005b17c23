//! API integration tests: drive the axum router in-process

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::*;
use estimate_search::api::{router, ApiConfig, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "estimate-search-test-boundary";

struct Harness {
    _dir: TempDir,
    fixtures: TempDir,
    app: Router,
    upload_dir: std::path::PathBuf,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let upload_dir = dir.path().join("uploads");
    let config = ApiConfig {
        upload_dir: upload_dir.clone(),
        ..ApiConfig::default()
    };
    let state = AppState::new(&config).unwrap();
    Harness {
        _dir: dir,
        fixtures: TempDir::new().unwrap(),
        app: router(state, config.max_upload_bytes),
        upload_dir,
    }
}

/// Build a multipart/form-data body
fn multipart(file: Option<(&str, Vec<u8>)>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn post_upload(app: &Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn fixture_bytes(dir: &Path, sheets: Vec<FxSheet>) -> Vec<u8> {
    let path = write_workbook(dir, "fixture.xlsx", sheets);
    std::fs::read(path).unwrap()
}

fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

// ═══════════════════════════════════════════════════════════════════════════
// PROBES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_index_serves_upload_form() {
    let h = harness();
    let (status, body) = get(&h.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert!(html.contains("name=\"search_term\""));
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body) = get(&h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["data"]["status"], json!("healthy"));
}

#[tokio::test]
async fn test_version_reports_settings() {
    let h = harness();
    let (_, body) = get(&h.app, "/version").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["threshold"], json!(70));
    assert_eq!(json["data"]["sheet_marker"], json!("Detail"));
    assert_eq!(json["data"]["modes"], json!(["list", "column", "sheet"]));
}

// ═══════════════════════════════════════════════════════════════════════════
// INPUT ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_upload_without_file_part() {
    let h = harness();
    let (status, json) = post_upload(&h.app, multipart(None, &[("search_term", "pipe")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"status": "error", "message": "No file part"}));
}

#[tokio::test]
async fn test_upload_with_unnamed_file() {
    let h = harness();
    let (status, json) = post_upload(&h.app, multipart(Some(("", b"x".to_vec())), &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"status": "error", "message": "No selected file"}));
}

#[tokio::test]
async fn test_search_mode_without_term() {
    let h = harness();
    let bytes = fixture_bytes(h.fixtures.path(), vec![detail_sheet()]);
    let (status, json) = post_upload(
        &h.app,
        multipart(Some(("estimate.xlsx", bytes)), &[("mode", "sheet")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], json!("No search term provided"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCHES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_upload_lists_projects() {
    let h = harness();
    let bytes = fixture_bytes(h.fixtures.path(), vec![projects_sheet()]);
    let (status, json) = post_upload(&h.app, multipart(Some(("estimate.xlsx", bytes)), &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "status": "success",
            "projects": [{"Project Name": "Lobby", "Square Footage": 1200, "Unit Cost": 50}]
        })
    );
    assert_eq!(scratch_entries(&h.upload_dir), 0);
}

#[tokio::test]
async fn test_upload_term_defaults_to_item_search() {
    let h = harness();
    let bytes = fixture_bytes(h.fixtures.path(), vec![detail_sheet()]);
    let (status, json) = post_upload(
        &h.app,
        multipart(Some(("estimate.xlsx", bytes)), &[("search_term", "pipe fitting")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], json!("success"));
    assert_eq!(json["items"][0]["Item"], json!("Steel Pipe Fitting"));
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_whole_sheet_search() {
    let h = harness();
    let bytes = fixture_bytes(h.fixtures.path(), vec![projects_sheet(), detail_sheet()]);
    let (_, json) = post_upload(
        &h.app,
        multipart(
            Some(("estimate.xlsx", bytes)),
            &[("search_term", "lobby"), ("mode", "sheet")],
        ),
    )
    .await;
    assert_eq!(json["matches"][0]["sheet"], json!("Projects"));
    assert_eq!(json["matches"][0]["column"], json!("Project Name"));
    assert_eq!(json["matches"][0]["score"], json!(100));
}

#[tokio::test]
async fn test_upload_sheet_not_found_is_structured_error() {
    let h = harness();
    let bytes = fixture_bytes(h.fixtures.path(), vec![projects_sheet()]);
    let (status, json) = post_upload(
        &h.app,
        multipart(Some(("estimate.xlsx", bytes)), &[("search_term", "pipe")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"status": "error", "message": "No sheet containing \"Detail\" found"})
    );
}

#[tokio::test]
async fn test_upload_corrupt_file_is_parse_error_and_cleaned_up() {
    let h = harness();
    let (status, json) = post_upload(
        &h.app,
        multipart(Some(("estimate.xlsx", b"PK not really a zip".to_vec())), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], json!("error"));
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read spreadsheet"));
    assert_eq!(scratch_entries(&h.upload_dir), 0);
}

#[tokio::test]
async fn test_upload_unsupported_extension() {
    let h = harness();
    let (status, json) = post_upload(
        &h.app,
        multipart(Some(("estimate.csv", b"Item\nPipe\n".to_vec())), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("unsupported file type"));
    assert_eq!(scratch_entries(&h.upload_dir), 0);
}
