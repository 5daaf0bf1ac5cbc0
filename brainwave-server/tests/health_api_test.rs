mod common;

use axum::http::StatusCode;
use common::{send, setup_test_app};

#[tokio::test]
async fn test_index_greets() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Brainwave is alive!");
}

#[tokio::test]
async fn test_live_and_ready() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dependencies"]["database"], true);
    assert_eq!(body["buildInfo"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let paths = body["paths"].as_object().unwrap();
    for path in ["/auth/register", "/auth/login", "/auth/me", "/thoughts", "/thoughts/{id}", "/health/ready"] {
        assert!(paths.contains_key(path), "missing {path}");
    }
    assert!(body["components"]["securitySchemes"]["bearer"].is_object());
}
