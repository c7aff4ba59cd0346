use crate::helpers::{app, config_with, get, send, send_raw};
use http::StatusCode;
use std::fs;
use tempfile::TempDir;

const INDEX: &str = "<!doctype html><title>Nurture</title>";

fn bundle_dir() -> TempDir {
    let dir = TempDir::new().expect("Creating a temp dir should not fail");
    fs::write(dir.path().join("index.html"), INDEX).expect("Writing index.html should not fail");
    fs::write(dir.path().join("app.js"), "console.log('hi');")
        .expect("Writing app.js should not fail");
    dir
}

fn static_config(dir: &TempDir) -> nurture_proxy::config::ServerConfig {
    let path = dir.path().to_str().expect("Temp path is UTF-8");
    config_with(&[("STATIC_DIR", path)])
}

#[tokio::test]
async fn test_root_serves_index_html() {
    let dir = bundle_dir();
    let (status, content_type, body) = send_raw(app(static_config(&dir)), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert_eq!(String::from_utf8_lossy(&body), INDEX);
}

#[tokio::test]
async fn test_bundle_files_are_served() {
    let dir = bundle_dir();
    let (status, _, body) = send_raw(app(static_config(&dir)), get("/app.js")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8_lossy(&body), "console.log('hi');");
}

#[tokio::test]
async fn test_api_routes_take_precedence() {
    let dir = bundle_dir();
    let (status, body) = send(app(static_config(&dir)), get("/api/config")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["projectId"], "nurture");
}

#[tokio::test]
async fn test_without_static_dir_unknown_paths_are_not_found() {
    let (status, _, _) = send_raw(app(config_with(&[])), get("/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
