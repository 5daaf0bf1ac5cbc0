#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use brainwave_server::{AppConfig, AppState, build_app, migrations::Migrator};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_HOST: &str = "brainwave.test";
pub const PASSWORD: &str = "a perfectly long password";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub async fn setup_test_app() -> Router {
    setup_test_app_with(AppConfig::default()).await
}

pub async fn setup_test_app_with(config: AppConfig) -> Router {
    let db = setup_test_db().await.expect("Failed to setup test database");
    build_app(AppState::new(db, config).expect("Failed to build app state"))
}

/// Send a request and decode the JSON response (or `Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", TEST_HOST);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn register(app: &Router, name: &str, email: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "confirmPassword": PASSWORD,
        })),
    )
    .await
}

/// Register a fresh account and return its bearer token.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = register(app, "Test User", email).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed for {email}");

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_thought(app: &Router, token: &str, thought: Value) -> Value {
    let (status, body) = send(app, "POST", "/thoughts", Some(token), Some(thought)).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create thought: {body}");
    body
}

/// `/thoughts` with `filter` percent-encoded.
pub fn filter_uri(filter: &str, rest: &str) -> String {
    let encoded = url_escape::encode_component(filter);
    if rest.is_empty() {
        format!("/thoughts?filter={encoded}")
    } else {
        format!("/thoughts?filter={encoded}&{rest}")
    }
}

pub fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|thought| thought["title"].as_str().unwrap().to_string())
        .collect()
}
