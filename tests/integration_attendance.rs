mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{TestApp, assert_error_code};
use edudesk::edudesk_models::Role;
use serde_json::json;

#[tokio::test]
async fn test_mark_and_list_attendance() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);
    let plan = app.store.seed_plan("Weekday Maths");
    let session = app
        .store
        .seed_session(plan.id, "Fractions", Utc.with_ymd_and_hms(2025, 6, 16, 9, 0, 0).unwrap());
    let ada = app.store.seed_student("Ada", "Lovelace", "ada@school.test");
    let alan = app.store.seed_student("Alan", "Turing", "alan@school.test");
    let uri = format!("/api/sessions/{}/attendance", session.id);

    let (status, body) = app
        .put(
            &uri,
            &token,
            json!({ "entries": [
                { "student_id": ada.id, "status": "present" },
                { "student_id": alan.id, "status": "absent" }
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changes"], 2);

    // Marking again replaces the earlier status instead of adding a record.
    let (status, _) = app
        .put(
            &uri,
            &token,
            json!({ "entries": [{ "student_id": alan.id, "status": "late" }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    let alan_record = records
        .iter()
        .find(|r| r["student_id"] == alan.id.to_string())
        .unwrap();
    assert_eq!(alan_record["status"], "late");
}

#[tokio::test]
async fn test_attendance_for_unknown_session() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);
    let ada = app.store.seed_student("Ada", "Lovelace", "ada@school.test");
    let uri = format!("/api/sessions/{}/attendance", uuid::Uuid::new_v4());

    let (status, body) = app
        .put(
            &uri,
            &token,
            json!({ "entries": [{ "student_id": ada.id, "status": "present" }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");

    let (status, _) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_entries_rejected() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);
    let plan = app.store.seed_plan("Weekday Maths");
    let session = app
        .store
        .seed_session(plan.id, "Fractions", Utc.with_ymd_and_hms(2025, 6, 16, 9, 0, 0).unwrap());

    let (status, body) = app
        .put(
            &format!("/api/sessions/{}/attendance", session.id),
            &token,
            json!({ "entries": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_code(&body, "Error_Resource_InvalidInput");
}

#[tokio::test]
async fn test_unknown_student_leaves_records_untouched() {
    let app = TestApp::new();
    let token = app.token(Role::Teacher);
    let plan = app.store.seed_plan("Weekday Maths");
    let session = app
        .store
        .seed_session(plan.id, "Fractions", Utc.with_ymd_and_hms(2025, 6, 16, 9, 0, 0).unwrap());
    let ada = app.store.seed_student("Ada", "Lovelace", "ada@school.test");
    let uri = format!("/api/sessions/{}/attendance", session.id);

    let (status, body) = app
        .put(
            &uri,
            &token,
            json!({ "entries": [
                { "student_id": ada.id, "status": "present" },
                { "student_id": uuid::Uuid::new_v4(), "status": "present" }
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_code(&body, "Error_EFCore_ConstraintViolation");

    let (_, body) = app.get(&uri, &token).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
