//! Integration tests for request routing and file serving.
//!
//! Requests go through the full router with `oneshot`, no socket involved.

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{INDEX_HTML, context_for, create_site};
use live_server::server::{RELOAD_SCRIPT, build_router};
use std::fs;
use tower::ServiceExt;

async fn get(root: &std::path::Path, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let app = build_router(context_for(root));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_root_serves_index_with_script() {
    let temp = create_site();
    let (status, content_type, body) = get(temp.path(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));

    let (before, after) = INDEX_HTML.split_at(INDEX_HTML.find("</head>").unwrap());
    let expected = format!("{}{}{}", before, RELOAD_SCRIPT, after);
    assert_eq!(String::from_utf8(body).unwrap(), expected);
}

#[tokio::test]
async fn test_html_without_head_is_unchanged() {
    let temp = create_site();
    let (status, content_type, body) = get(temp.path(), "/docs/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert_eq!(body, b"<p>no head here</p>");
}

#[tokio::test]
async fn test_directory_without_trailing_slash_uses_index() {
    let temp = create_site();
    let (status, _, body) = get(temp.path(), "/docs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<p>no head here</p>");
}

#[tokio::test]
async fn test_static_file_exact_bytes() {
    let temp = create_site();
    let (status, content_type, body) = get(temp.path(), "/style.css").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/css"));
    assert_eq!(body, b"body { color: red; }");
}

#[tokio::test]
async fn test_binary_file_untouched() {
    let temp = create_site();
    let bytes: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, b'<', b'/', b'h', b'e', b'a', b'd', b'>'];
    fs::write(temp.path().join("logo.png"), &bytes).unwrap();

    let (status, content_type, body) = get(temp.path(), "/logo.png").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(body, bytes);
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let temp = create_site();
    let (status, _, _) = get(temp.path(), "/missing.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_directory_without_index_is_404() {
    let temp = create_site();
    let (status, _, _) = get(temp.path(), "/empty/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_is_404() {
    let outer = tempfile::TempDir::new().unwrap();
    let root = outer.path().join("site");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();

    for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/docs/..%2f..%2fsecret.txt"] {
        let (status, _, body) = get(&root, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_ne!(body, b"secret");
    }
}

#[tokio::test]
async fn test_percent_encoded_name() {
    let temp = create_site();
    fs::write(temp.path().join("read me.txt"), "spaced").unwrap();

    let (status, _, body) = get(temp.path(), "/read%20me.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"spaced");
}

#[tokio::test]
async fn test_query_string_ignored() {
    let temp = create_site();
    let (status, _, body) = get(temp.path(), "/style.css?v=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"body { color: red; }");
}

#[tokio::test]
async fn test_ws_path_without_upgrade_is_rejected() {
    let temp = create_site();
    let (status, _, _) = get(temp.path(), "/ws").await;
    assert!(status.is_client_error());
}
