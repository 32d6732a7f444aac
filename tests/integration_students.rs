mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error_code, generate_unique_email};
use edudesk::edudesk_core::error_info::PersistenceError;
use edudesk::edudesk_models::Role;
use serde_json::json;

fn student_body(email: &str) -> serde_json::Value {
    json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": email,
        "phone": "+1 555 010 2030",
        "date_of_birth": "2010-01-15"
    })
}

#[tokio::test]
async fn test_create_and_get_student() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let email = generate_unique_email();

    let (status, created) = app.post("/api/students", &token, student_body(&email)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], email);
    assert_eq!(created["is_active"], true);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/students/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_teacher_cannot_create_student() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);

    let (status, body) = app
        .post("/api/students", &token, student_body(&generate_unique_email()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "Error_User_PermissionDenied");
    assert_eq!(app.store.student_count(), 0);
}

#[tokio::test]
async fn test_duplicate_email_is_constraint_violation() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let existing = app.store.seed_student("Ada", "Lovelace", "ada@school.test");

    let (status, body) = app
        .post("/api/students", &token, student_body(&existing.email))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_code(&body, "Error_EFCore_ConstraintViolation");
}

#[tokio::test]
async fn test_invalid_phone_rejected() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let mut body = student_body(&generate_unique_email());
    body["phone"] = json!("12");

    let (status, body) = app.post("/api/students", &token, body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_code(&body, "Error_Resource_InvalidInput");
}

#[tokio::test]
async fn test_invalid_email_fails_validation() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);

    let (status, body) = app
        .post("/api/students", &token, student_body("not-an-email"))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_list_students_filters_and_pages() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);
    let north = app.store.seed_region("NORTH", "North");
    app.store.seed_student("Ada", "Lovelace", "ada@school.test");
    app.store.seed_student("Alan", "Turing", "alan@school.test");
    app.store.seed_student("Grace", "Hopper", "grace@school.test");

    let (status, body) = app.get("/api/students?limit=2", &token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["last_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Hopper", "Lovelace"]);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], true);

    let (_, body) = app.get("/api/students?search=TUR", &token).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["email"], "alan@school.test");

    let (_, body) = app
        .get(&format!("/api/students?region_id={}", north.id), &token)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_update_student() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let student = app.store.seed_student("Ada", "Lovelace", "ada@school.test");
    let region = app.store.seed_region("WEST", "West");

    let (status, body) = app
        .put(
            &format!("/api/students/{}", student.id),
            &token,
            json!({ "last_name": "Byron", "region_id": region.id, "is_active": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_name"], "Byron");
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["region_id"], region.id.to_string());
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn test_update_missing_student_is_not_found() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);

    let (status, body) = app
        .put(
            &format!("/api/students/{}", uuid::Uuid::new_v4()),
            &token,
            json!({ "last_name": "Nobody" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_code(&body, "Error_Resource_NotFound");
    assert_eq!(body["error"], "Student not found");
}

#[tokio::test]
async fn test_delete_student() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    let student = app.store.seed_student("Ada", "Lovelace", "ada@school.test");
    let uri = format!("/api/students/{}", student.id);

    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_code(&body, "Error_Resource_NotFound");

    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_commit_surfaces_persistence_code() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    app.store.fail_next_write(PersistenceError::FailedTransaction);

    let (status, body) = app
        .post("/api/students", &token, student_body(&generate_unique_email()))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_code(&body, "Error_EFCore_FailedTransaction");
    assert_eq!(app.store.student_count(), 0);
}

#[tokio::test]
async fn test_commit_conflict_creates_no_student() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);
    app.store.fail_next_write(PersistenceError::ConcurrencyConflict);

    let (status, body) = app
        .post("/api/students", &token, student_body(&generate_unique_email()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_code(&body, "Error_EFCore_ConcurrencyConflict");
    assert_eq!(app.store.student_count(), 0);

    // Nothing was left half-written; the same request succeeds next time.
    let (status, _) = app
        .post("/api/students", &token, student_body(&generate_unique_email()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.store.student_count(), 1);
}
