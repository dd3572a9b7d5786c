//! Bulk import integration tests.
//!
//! Run with: `cargo test -p vidlink-api --test import_test`

mod helpers;

use axum::body::Bytes;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{bearer, links_path, setup_test_app, ORGANIZER_TOKEN, VIEWER_TOKEN};
use serde_json::json;

#[tokio::test]
async fn test_import_json() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .json(&json!([{"submission": "ABC123", "video_id": "dQw4w9WgXcQ"}]))
        .await;
    assert_eq!(response.status_code(), 201);
    let data: serde_json::Value = response.json();
    assert_eq!(data["created"], 1);

    assert_eq!(app.links.len(), 1);
    let link = client
        .get(&links_path("ABC123/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .await;
    let data: serde_json::Value = link.json();
    assert_eq!(data["youtube_link"], "https://youtube.com/watch?v=dQw4w9WgXcQ");
}

#[tokio::test]
async fn test_import_same_submission_twice() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .json(&json!([
            {"submission": "ABC123", "video_id": "first"},
            {"submission": "ABC123", "video_id": "https://youtu.be/second"}
        ]))
        .await;
    assert_eq!(response.status_code(), 201);
    let data: serde_json::Value = response.json();
    assert_eq!(data["created"], 1);
    assert_eq!(data["updated"], 1);
    assert_eq!(app.links.len(), 1);
}

#[tokio::test]
async fn test_import_raw_csv_skips_blank_rows() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .bytes(Bytes::from_static(
            b"submission,video_id\nABC123,https://youtu.be/abc\n,\nDEF456,def\n",
        ))
        .content_type("text/csv")
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(app.links.len(), 2);
}

#[tokio::test]
async fn test_import_sniffs_untyped_body() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .bytes(Bytes::from_static(
            br#"[{"submission": "DEF456", "video_id": "def"}]"#,
        ))
        .content_type("application/octet-stream")
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(app.links.len(), 1);
}

#[tokio::test]
async fn test_import_multipart_upload() {
    let app = setup_test_app();

    let part = Part::bytes(Bytes::from_static(b"submission,video_id\nABC123,abc\n"))
        .file_name("links.csv")
        .mime_type("text/csv");
    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .multipart(MultipartForm::new().add_part("file", part))
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(app.links.len(), 1);
}

#[tokio::test]
async fn test_import_rejects_two_files() {
    let app = setup_test_app();

    let first = Part::bytes(Bytes::from_static(b"submission,video_id\nABC123,abc\n"))
        .file_name("a.csv");
    let second = Part::bytes(Bytes::from_static(b"submission,video_id\nDEF456,def\n"))
        .file_name("b.csv");
    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .multipart(
            MultipartForm::new()
                .add_part("file", first)
                .add_part("file", second),
        )
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_invalid_record_stores_nothing() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .json(&json!([
            {"submission": "ABC123", "video_id": "abc"},
            {"submission": "NOPE", "video_id": "def"}
        ]))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert!(data["error"]
        .as_str()
        .is_some_and(|msg| msg.contains("Record 2")));
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_malformed_payloads() {
    let app = setup_test_app();
    let client = app.client();

    let json = client
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .bytes(Bytes::from_static(b"[{\"submission\": "))
        .content_type("application/json")
        .await;
    assert_eq!(json.status_code(), 400);
    let data: serde_json::Value = json.json();
    assert_eq!(data["code"], "MALFORMED_PAYLOAD");

    let csv = client
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .bytes(Bytes::from_static(b"code,url\nABC123,abc\n"))
        .content_type("text/csv")
        .await;
    assert_eq!(csv.status_code(), 400);

    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_import_without_records() {
    let app = setup_test_app();
    let client = app.client();

    let json = client
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .json(&json!([]))
        .await;
    assert_eq!(json.status_code(), 400);
    let data: serde_json::Value = json.json();
    assert_eq!(data["code"], "MALFORMED_PAYLOAD");

    let header_only = client
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .bytes(Bytes::from_static(b"submission,video_id\n"))
        .content_type("text/csv")
        .await;
    assert_eq!(header_only.status_code(), 400);
}

#[tokio::test]
async fn test_import_too_large() {
    let app = setup_test_app();

    let body = format!(
        "[{}]",
        vec![r#"{"submission": "ABC123", "video_id": "abc"}"#; 2000].join(",")
    );
    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(ORGANIZER_TOKEN))
        .bytes(Bytes::from(body))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_viewer_cannot_import() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&links_path("import/"))
        .add_header("Authorization", bearer(VIEWER_TOKEN))
        .json(&json!([{"submission": "ABC123", "video_id": "abc"}]))
        .await;

    assert_eq!(response.status_code(), 403);
}
