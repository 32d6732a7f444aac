mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error_code};
use edudesk::edudesk_core::error_info::PersistenceError;
use edudesk::edudesk_models::Role;
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_plans() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);

    for name in ["Weekday Maths", "Evening English"] {
        let (status, body) = app
            .post(
                "/api/plans",
                &token,
                json!({
                    "name": name,
                    "price_cents": 15000,
                    "sessions_per_week": 2,
                    "duration_weeks": 10
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["version"], 1);
    }

    let (status, body) = app.get("/api/plans?page=1&limit=10", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Evening English");
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["page"], 1);
}

#[tokio::test]
async fn test_plan_validation() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, _) = app
        .post(
            "/api/plans",
            &token,
            json!({
                "name": "Broken",
                "price_cents": -1,
                "sessions_per_week": 0,
                "duration_weeks": 10
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_bumps_version() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let plan = app.store.seed_plan("Weekday Maths");

    let (status, body) = app
        .put(
            &format!("/api/plans/{}", plan.id),
            &token,
            json!({ "price_cents": 18000, "version": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_cents"], 18000);
    assert_eq!(body["version"], 2);
    assert_eq!(body["name"], "Weekday Maths");
}

#[tokio::test]
async fn test_stale_version_is_concurrency_conflict() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let plan = app.store.seed_plan("Weekday Maths");
    let uri = format!("/api/plans/{}", plan.id);

    let (status, _) = app
        .put(&uri, &token, json!({ "name": "First writer", "version": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(&uri, &token, json!({ "name": "Second writer", "version": 1 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_code(&body, "Error_EFCore_ConcurrencyConflict");

    let (_, current) = app.get(&uri, &token).await;
    assert_eq!(current["name"], "First writer");
    assert_eq!(current["version"], 2);
}

#[tokio::test]
async fn test_conflict_reported_by_store_leaves_plan_unchanged() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let plan = app.store.seed_plan("Weekday Maths");
    let uri = format!("/api/plans/{}", plan.id);
    app.store.fail_next_write(PersistenceError::ConcurrencyConflict);

    // The version matches; the conflict comes from the commit itself.
    let (status, body) = app
        .put(&uri, &token, json!({ "name": "Renamed", "version": 1 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_code(&body, "Error_EFCore_ConcurrencyConflict");
    assert_eq!(app.store.write_count(), 0);

    let (_, current) = app.get(&uri, &token).await;
    assert_eq!(current["name"], "Weekday Maths");
    assert_eq!(current["version"], 1);
}

#[tokio::test]
async fn test_delete_plan() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);
    let plan = app.store.seed_plan("Short course");
    let uri = format!("/api/plans/{}", plan.id);

    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Plan not found");
}

#[tokio::test]
async fn test_teacher_cannot_write_plans() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);
    let plan = app.store.seed_plan("Weekday Maths");

    let (status, _) = app.get(&format!("/api/plans/{}", plan.id), &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&format!("/api/plans/{}", plan.id), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "Error_User_PermissionDenied");
}
