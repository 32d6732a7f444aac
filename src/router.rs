use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::cancellation::cancellation_boundary;
use crate::modules::auth::router::init_auth_router;
use crate::modules::calendar::router::init_calendar_router;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::payments::router::init_payments_router;
use crate::modules::plans::router::init_plans_router;
use crate::modules::regions::router::init_regions_router;
use crate::modules::sessions::router::init_sessions_router;
use crate::modules::settings::router::init_settings_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

/// API routes only, without docs or layers.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router())
        .nest("/students", init_students_router())
        .nest("/plans", init_plans_router())
        .nest("/sessions", init_sessions_router())
        .nest("/payments", init_payments_router())
        .nest("/regions", init_regions_router())
        .nest("/settings", init_settings_router())
        .nest("/dashboard", init_dashboard_router())
        .nest("/calendar", init_calendar_router())
}

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api", api_router())
        .with_state(state)
        // Innermost: canceled outcomes become 499 before logging and metrics see them.
        .layer(middleware::from_fn(cancellation_boundary))
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
}
