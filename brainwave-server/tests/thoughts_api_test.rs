mod common;

use axum::http::StatusCode;
use common::{create_thought, register_and_login, send, setup_test_app};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_fetch() {
    let app = setup_test_app().await;
    let token = register_and_login(&app, "owner@example.com").await;

    let created = create_thought(
        &app,
        &token,
        json!({
            "title": "  Call the plumber  ",
            "body": "The kitchen tap drips",
            "status": "ACTIVE",
            "nextReminder": "2026-03-01T09:00:00Z"
        }),
    )
    .await;
    assert_eq!(created["title"], "Call the plumber");
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["lastFollowUp"], serde_json::Value::Null);
    assert!(created["nextReminder"].as_str().unwrap().starts_with("2026-03-01T09:00:00"));

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/thoughts/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_validates_lengths_and_status() {
    let app = setup_test_app().await;
    let token = register_and_login(&app, "owner@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/thoughts",
        Some(&token),
        Some(json!({"title": "abc", "body": "", "status": "ACTIVE"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "title");

    let (status, _) = send(
        &app,
        "POST",
        "/thoughts",
        Some(&token),
        Some(json!({"title": "Long enough", "status": "SOMEDAY"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_patch_updates_given_fields() {
    let app = setup_test_app().await;
    let token = register_and_login(&app, "owner@example.com").await;
    let created = create_thought(
        &app,
        &token,
        json!({
            "title": "Renew passport",
            "body": "Expires in May",
            "status": "ACTIVE",
            "nextReminder": "2026-04-01T00:00:00Z"
        }),
    )
    .await;
    let uri = format!("/thoughts/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(&app, "PATCH", &uri, Some(&token), Some(json!({"status": "CLOSED"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "CLOSED");
    assert_eq!(updated["title"], "Renew passport");
    assert_eq!(updated["nextReminder"], created["nextReminder"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let (status, cleared) = send(&app, "PATCH", &uri, Some(&token), Some(json!({"nextReminder": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["nextReminder"], serde_json::Value::Null);
    assert_eq!(cleared["status"], "CLOSED");

    let (status, body) = send(&app, "PATCH", &uri, Some(&token), Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_delete_returns_removed_thought() {
    let app = setup_test_app().await;
    let token = register_and_login(&app, "owner@example.com").await;
    let created = create_thought(&app, &token, json!({"title": "Throw away", "status": "INACTIVE"})).await;
    let uri = format!("/thoughts/{}", created["id"].as_str().unwrap());

    let (status, deleted) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, created);

    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = setup_test_app().await;
    let token = register_and_login(&app, "owner@example.com").await;
    let id = Uuid::new_v4();

    let (status, body) = send(&app, "GET", &format!("/thoughts/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Thought with ID '{id}' not found"));
}

#[tokio::test]
async fn test_other_users_thoughts_are_invisible() {
    let app = setup_test_app().await;
    let owner = register_and_login(&app, "owner@example.com").await;
    let intruder = register_and_login(&app, "intruder@example.com").await;

    let created = create_thought(&app, &owner, json!({"title": "Private note", "status": "ACTIVE"})).await;
    let uri = format!("/thoughts/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "GET", &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PATCH", &uri, Some(&intruder), Some(json!({"title": "Hijacked!"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listing) = send(&app, "GET", "/thoughts", Some(&intruder), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["page"]["totalElements"], 0);

    let (status, still_there) = send(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["title"], "Private note");
}
