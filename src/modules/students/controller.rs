use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use edudesk_core::{AppError, CancelSignal, DataResult};
use edudesk_models::StudentId;
use tracing::instrument;

use super::model::{CreateStudentDto, Student, StudentFilterParams, UpdateStudentDto};
use super::service::StudentService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireStudentsRead, RequireStudentsWrite};
use crate::outcome_ext::OutcomeExt;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Enrol a student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireStudentsWrite(_user): RequireStudentsWrite,
    cancel: CancelSignal,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student =
        StudentService::create(state.repos.students.as_ref(), &state.validation, dto, &cancel)
            .await
            .into_app_result()?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// List students with optional filters
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Page of students", body = DataResult<Student>)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, cancel))]
pub async fn list_students(
    State(state): State<AppState>,
    RequireStudentsRead(_user): RequireStudentsRead,
    cancel: CancelSignal,
    Query(params): Query<StudentFilterParams>,
) -> Result<Json<DataResult<Student>>, AppError> {
    let page = StudentService::list(state.repos.students.as_ref(), params, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, cancel))]
pub async fn get_student(
    State(state): State<AppState>,
    RequireStudentsRead(_user): RequireStudentsRead,
    cancel: CancelSignal,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get(state.repos.students.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, cancel, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireStudentsWrite(_user): RequireStudentsWrite,
    cancel: CancelSignal,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update(
        state.repos.students.as_ref(),
        &state.validation,
        id,
        dto,
        &cancel,
    )
    .await
    .into_app_result()?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, cancel))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireStudentsWrite(_user): RequireStudentsWrite,
    cancel: CancelSignal,
    Path(id): Path<StudentId>,
) -> Result<StatusCode, AppError> {
    StudentService::delete(state.repos.students.as_ref(), id, &cancel)
        .await
        .into_app_result()?;
    Ok(StatusCode::NO_CONTENT)
}
