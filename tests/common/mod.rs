#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use edudesk::edudesk_models::{Role, UserAccount};
use edudesk::state::AppState;
use edudesk::testing::{InMemoryStore, test_state, token_for};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "testpass123";

static EMAIL_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn generate_unique_email() -> String {
    let n = EMAIL_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("user{n}-{}@edudesk.test", uuid::Uuid::new_v4().simple())
}

/// The application over a fresh in-memory store.
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let state = test_state(store.clone());
        let router = edudesk::router::init_router(state.clone());
        Self {
            store,
            state,
            router,
        }
    }

    /// Seeds an account with [`PASSWORD`].
    pub fn create_user(&self, role: Role) -> UserAccount {
        self.store
            .seed_user(&generate_unique_email(), PASSWORD, role)
            .unwrap()
    }

    /// Seeds an account and returns a token for it.
    pub fn token(&self, role: Role) -> String {
        let account = self.create_user(role);
        token_for(&self.state, &account).unwrap()
    }

    pub fn build_request(
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Self::build_request(Method::GET, uri, Some(token), None))
            .await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Self::build_request(Method::POST, uri, Some(token), Some(body)))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Self::build_request(Method::PUT, uri, Some(token), Some(body)))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Self::build_request(Method::DELETE, uri, Some(token), None))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(Self::build_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        ))
        .await
    }
}

pub fn assert_error_code(body: &Value, code: &str) {
    assert_eq!(body["code"], code, "unexpected error body: {body}");
    assert!(body["error"].is_string());
}
