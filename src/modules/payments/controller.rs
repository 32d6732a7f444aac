use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use edudesk_core::{AppError, CancelSignal, DataResult, PaginationParams};
use edudesk_models::{PaymentId, StudentId};
use tracing::instrument;

use super::model::{Payment, RecordPaymentDto};
use super::service::PaymentService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequirePaymentsRead, RequirePaymentsWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Record a tuition payment
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = RecordPaymentDto,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn record_payment(
    State(state): State<AppState>,
    RequirePaymentsWrite(_user): RequirePaymentsWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<RecordPaymentDto>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = PaymentService::record(
        state.repos.payments.as_ref(),
        state.repos.students.as_ref(),
        dto,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, cancel))]
pub async fn get_payment(
    State(state): State<AppState>,
    RequirePaymentsRead(_user): RequirePaymentsRead,
    cancel: CancelSignal,
    Path(id): Path<PaymentId>,
) -> Result<Json<Payment>, AppError> {
    let payment = PaymentService::get(state.repos.payments.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(payment))
}

/// Payments made by one student, newest first
#[utoipa::path(
    get,
    path = "/api/students/{id}/payments",
    params(("id" = Uuid, Path, description = "Student ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of payments", body = DataResult<Payment>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, cancel))]
pub async fn list_student_payments(
    State(state): State<AppState>,
    RequirePaymentsRead(_user): RequirePaymentsRead,
    cancel: CancelSignal,
    Path(student_id): Path<StudentId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<DataResult<Payment>>, AppError> {
    let page = PaymentService::list_for_student(
        state.repos.payments.as_ref(),
        state.repos.students.as_ref(),
        student_id,
        params,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok(Json(page))
}
