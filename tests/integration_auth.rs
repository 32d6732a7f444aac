mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::{PASSWORD, TestApp, assert_error_code, generate_unique_email};
use edudesk::edudesk_models::Role;
use serde_json::json;

#[tokio::test]
async fn test_login_success_returns_token_and_user() {
    let app = TestApp::new();
    let user = app.create_user(Role::Staff);

    let (status, body) = app.login(&user.email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["email"], user.email);
    assert!(body["user"].get("password_hash").is_none());

    let token = body["access_token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "staff");
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    let user = app.create_user(Role::Teacher);

    let (status, _) = app.login(&user.email.to_uppercase(), PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    let app = TestApp::new();

    let (status, body) = app.login("nobody@edudesk.test", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "Error_User_InvalidCredentials");
}

#[tokio::test]
async fn test_failed_logins_lock_the_account() {
    let app = TestApp::new();
    let user = app.create_user(Role::Staff);

    // The test lockout policy allows three attempts.
    for _ in 0..2 {
        let (status, body) = app.login(&user.email, "wrong-password").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_error_code(&body, "Error_User_InvalidCredentials");
    }

    let (status, body) = app.login(&user.email, "wrong-password").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_error_code(&body, "Error_User_AttemptExceeded");

    // Even the right password is refused while the lock holds.
    let (status, body) = app.login(&user.email, PASSWORD).await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_error_code(&body, "Error_User_Locked");

    let stored = app.store.user(&user.email).unwrap();
    assert_eq!(stored.failed_login_attempts, 3);
    assert!(stored.locked_until.is_some());
}

#[tokio::test]
async fn test_concurrent_failed_logins_still_lock_the_account() {
    let app = TestApp::new();
    let user = app.create_user(Role::Staff);
    // Every request reads the account before any of them records a failure.
    app.store.set_latency(Duration::from_millis(50));

    let attempts = tokio::join!(
        app.login(&user.email, "wrong-password"),
        app.login(&user.email, "wrong-password"),
        app.login(&user.email, "wrong-password"),
        app.login(&user.email, "wrong-password"),
        app.login(&user.email, "wrong-password"),
    );
    let statuses = [attempts.0.0, attempts.1.0, attempts.2.0, attempts.3.0, attempts.4.0];

    let count = |wanted: StatusCode| statuses.iter().filter(|s| **s == wanted).count();
    assert_eq!(count(StatusCode::UNAUTHORIZED), 2);
    assert_eq!(count(StatusCode::TOO_MANY_REQUESTS), 1);
    assert_eq!(count(StatusCode::LOCKED), 2);

    let stored = app.store.user(&user.email).unwrap();
    assert_eq!(stored.failed_login_attempts, 5);
    assert!(stored.locked_until.is_some());

    let (status, body) = app.login(&user.email, PASSWORD).await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_error_code(&body, "Error_User_Locked");
}

#[tokio::test]
async fn test_expired_lock_restarts_the_count() {
    let app = TestApp::new();
    let user = app.create_user(Role::Staff);
    for _ in 0..3 {
        app.login(&user.email, "wrong-password").await;
    }
    app.store
        .expire_lock(&user.email)
        .expect("account should be locked");

    let (status, body) = app.login(&user.email, "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "Error_User_InvalidCredentials");

    let stored = app.store.user(&user.email).unwrap();
    assert_eq!(stored.failed_login_attempts, 1);
    assert!(stored.locked_until.is_none());
}

#[tokio::test]
async fn test_successful_login_resets_failure_count() {
    let app = TestApp::new();
    let user = app.create_user(Role::Staff);

    app.login(&user.email, "wrong-password").await;
    assert_eq!(app.store.user(&user.email).unwrap().failed_login_attempts, 1);

    let (status, _) = app.login(&user.email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.user(&user.email).unwrap().failed_login_attempts, 0);
}

#[tokio::test]
async fn test_inactive_account_cannot_log_in() {
    let app = TestApp::new();
    let user = app.create_user(Role::Staff);
    app.store.deactivate_user(user.id);

    let (status, body) = app.login(&user.email, PASSWORD).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "Error_User_Inactive");
}

#[tokio::test]
async fn test_register_as_admin() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);
    let email = generate_unique_email();

    let (status, body) = app
        .post(
            "/api/auth/register",
            &token,
            json!({
                "first_name": "New",
                "last_name": "Teacher",
                "email": email,
                "password": "longenough",
                "role": "teacher"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "teacher");

    let (status, _) = app.login(&email, "longenough").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);
    let existing = app.create_user(Role::Staff);

    let (status, body) = app
        .post(
            "/api/auth/register",
            &token,
            json!({
                "first_name": "Dup",
                "last_name": "User",
                "email": existing.email,
                "password": "longenough"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_code(&body, "Error_User_AlreadyExists");
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app
        .post(
            "/api/auth/register",
            &token,
            json!({
                "first_name": "Short",
                "last_name": "Pass",
                "email": generate_unique_email(),
                "password": "abc"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_code(&body, "Error_Resource_InvalidInput");
}

#[tokio::test]
async fn test_register_requires_admin() {
    let app = TestApp::new();
    let token = app.token(Role::Staff);

    let (status, body) = app
        .post(
            "/api/auth/register",
            &token,
            json!({
                "first_name": "No",
                "last_name": "Access",
                "email": generate_unique_email(),
                "password": "longenough"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_code(&body, "Error_User_PermissionDenied");
}

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let app = TestApp::new();

    let (status, body) = app
        .send(TestApp::build_request(Method::GET, "/api/auth/me", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "Error_Auth_MissingToken");

    let (status, body) = app.get("/api/auth/me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "Error_Auth_InvalidToken");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let user = app.create_user(Role::Teacher);
    let token = edudesk::testing::token_for(&app.state, &user).unwrap();

    let (status, body) = app
        .post(
            "/api/auth/change-password",
            &token,
            json!({ "current_password": "not-it", "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_code(&body, "Error_User_InvalidCredentials");

    let (status, _) = app
        .post(
            "/api/auth/change-password",
            &token,
            json!({ "current_password": PASSWORD, "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.login(&user.email, PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login(&user.email, "brand-new-pass").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_login_body_is_bad_request() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("code").is_none());
}
