use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use edudesk_core::calendar::IsoWeekRef;
use edudesk_core::{PaginationMeta, PaginationParams};
use edudesk_models::attendance::{
    AttendanceEntry, AttendanceRecord, AttendanceStatus, MarkAttendanceDto, MarkAttendanceResponse,
};
use edudesk_models::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
};
use edudesk_models::calendar::{CalendarDay, WeekView};
use edudesk_models::dashboard::DashboardSummary;
use edudesk_models::payments::{Payment, PaymentMethod, RecordPaymentDto};
use edudesk_models::plans::{CreatePlanDto, Plan, UpdatePlanDto};
use edudesk_models::regions::{CreateRegionDto, Region};
use edudesk_models::sessions::{ClassSession, CreateSessionDto};
use edudesk_models::settings::{Settings, UpdateSettingsDto};
use edudesk_models::students::{CreateStudentDto, Student, UpdateStudentDto};
use edudesk_models::{Role, User};

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Student not found")]
    pub error: String,
    /// Stable error code; absent for malformed requests and internal faults
    #[schema(example = "Error_Resource_NotFound")]
    pub code: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::change_password,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::plans::controller::create_plan,
        crate::modules::plans::controller::list_plans,
        crate::modules::plans::controller::get_plan,
        crate::modules::plans::controller::update_plan,
        crate::modules::plans::controller::delete_plan,
        crate::modules::sessions::controller::create_session,
        crate::modules::sessions::controller::get_session,
        crate::modules::sessions::controller::list_week_sessions,
        crate::modules::sessions::controller::delete_session,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::list_attendance,
        crate::modules::payments::controller::record_payment,
        crate::modules::payments::controller::get_payment,
        crate::modules::payments::controller::list_student_payments,
        crate::modules::regions::controller::create_region,
        crate::modules::regions::controller::list_regions,
        crate::modules::regions::controller::delete_region,
        crate::modules::settings::controller::get_settings,
        crate::modules::settings::controller::update_settings,
        crate::modules::dashboard::controller::get_summary,
        crate::modules::calendar::controller::get_week,
    ),
    components(
        schemas(
            ErrorResponse,
            User,
            Role,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            MessageResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            Plan,
            CreatePlanDto,
            UpdatePlanDto,
            ClassSession,
            CreateSessionDto,
            AttendanceStatus,
            AttendanceEntry,
            AttendanceRecord,
            MarkAttendanceDto,
            MarkAttendanceResponse,
            Payment,
            PaymentMethod,
            RecordPaymentDto,
            Region,
            CreateRegionDto,
            Settings,
            UpdateSettingsDto,
            DashboardSummary,
            IsoWeekRef,
            CalendarDay,
            WeekView,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration and password changes"),
        (name = "Students", description = "Student enrolment"),
        (name = "Plans", description = "Tuition plans"),
        (name = "Sessions", description = "Class scheduling"),
        (name = "Attendance", description = "Attendance marking"),
        (name = "Payments", description = "Tuition payments"),
        (name = "Regions", description = "Regions students are grouped by"),
        (name = "Settings", description = "Organisation settings"),
        (name = "Dashboard", description = "Headline numbers"),
        (name = "Calendar", description = "Week views")
    ),
    info(
        title = "EduDesk API",
        version = "0.1.0",
        description = "Back office for a tutoring school: students, plans, sessions, attendance and payments.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/students/{id}",
            "/api/students/{id}/payments",
            "/api/plans/{id}",
            "/api/sessions/week/{year}/{week}",
            "/api/sessions/{id}/attendance",
            "/api/regions/{id}",
            "/api/settings",
            "/api/dashboard/summary",
            "/api/calendar/weeks/{year}/{week}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
