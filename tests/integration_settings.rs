mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error_code};
use edudesk::edudesk_models::Role;
use serde_json::json;

#[tokio::test]
async fn test_get_default_settings() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);

    let (status, body) = app.get("/api/settings", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization_name"], "EduDesk");
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["week_starts_on"], 1);
}

#[tokio::test]
async fn test_update_settings() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app
        .put("/api/settings", &token, json!({ "currency": "eur", "timezone": "Europe/Paris" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["timezone"], "Europe/Paris");
    assert_eq!(body["organization_name"], "EduDesk");

    let (_, body) = app.get("/api/settings", &token).await;
    assert_eq!(body["currency"], "EUR");
}

#[tokio::test]
async fn test_unknown_timezone_rejected() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app
        .put("/api/settings", &token, json!({ "currency": "EUR", "timezone": "Mars/Olympus_Mons" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_code(&body, "Error_Resource_InvalidInput");
    assert_eq!(app.store.write_count(), 0);

    let (_, body) = app.get("/api/settings", &token).await;
    assert_eq!(body["timezone"], "UTC");
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn test_empty_update_rejected() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app.put("/api/settings", &token, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_code(&body, "Error_Resource_InvalidInput");
    assert_eq!(body["error"], "No settings to update");
}

#[tokio::test]
async fn test_staff_cannot_update_settings() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);

    let (status, body) = app
        .put("/api/settings", &token, json!({ "currency": "GBP" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "Error_User_PermissionDenied");
}
