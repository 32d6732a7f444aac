use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use edudesk_core::{AppError, CancelSignal};
use tracing::instrument;

use super::model::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, User,
};
use super::service::AuthService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{AuthUser, RequireUsersWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a staff account (admin only)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 403, description = "Missing users:write permission", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn register(
    State(state): State<AppState>,
    RequireUsersWrite(_admin): RequireUsersWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register(state.repos.users.as_ref(), &state.validation, dto, &cancel)
        .await
        .into_app_result()?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account inactive", body = ErrorResponse),
        (status = 423, description = "Account locked", body = ErrorResponse),
        (status = 429, description = "Too many failed attempts, account now locked", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn login(
    State(state): State<AppState>,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(
        state.repos.users.as_ref(),
        &state.jwt_config,
        &state.lockout,
        dto,
        Utc::now(),
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok(Json(response))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, cancel))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    cancel: CancelSignal,
) -> Result<Json<User>, AppError> {
    let user_id = auth_user.user_id()?;
    let user = AuthService::profile(state.repos.users.as_ref(), user_id, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(user))
}

/// Change the authenticated user's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Current password is wrong", body = ErrorResponse),
        (status = 422, description = "New password too short", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    AuthService::change_password(
        state.repos.users.as_ref(),
        &state.validation,
        user_id,
        dto,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
