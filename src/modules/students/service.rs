use chrono::Utc;
use edudesk_config::ValidationRules;
use edudesk_core::{CancelSignal, DataResult, ErrorInfo, Outcome, PaginationMeta};
use edudesk_models::{RegionId, StudentId};
use tracing::{info, instrument};

use super::model::{CreateStudentDto, Student, StudentFilterParams, UpdateStudentDto};
use super::repository::{StudentFilter, StudentRepository};

fn check_phone(rules: &ValidationRules, phone: Option<&str>) -> Result<(), ErrorInfo> {
    match phone {
        Some(phone) if !rules.phone_is_acceptable(phone) => Err(ErrorInfo::invalid_input(format!(
            "Phone number must have between {} and {} digits",
            rules.phone_min_digits, rules.phone_max_digits
        ))),
        _ => Ok(()),
    }
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(students, rules, dto, cancel))]
    pub async fn create(
        students: &dyn StudentRepository,
        rules: &ValidationRules,
        dto: CreateStudentDto,
        cancel: &CancelSignal,
    ) -> Outcome<Student> {
        cancel
            .run(async move {
                check_phone(rules, dto.phone.as_deref())?;
                let student = students.insert(&dto).await?;
                info!(student_id = %student.id, "Student created");
                Ok(student)
            })
            .await
    }

    #[instrument(skip(students, cancel))]
    pub async fn list(
        students: &dyn StudentRepository,
        params: StudentFilterParams,
        cancel: &CancelSignal,
    ) -> Outcome<DataResult<Student>> {
        cancel
            .run(async move {
                let filter = StudentFilter {
                    region_id: params.region_id.map(RegionId::from),
                    search: params.search_term().map(str::to_string),
                };
                let pagination = &params.pagination;
                let (data, total) = students
                    .list(&filter, pagination.limit(), pagination.offset())
                    .await?;
                Ok(DataResult::paged(
                    data,
                    PaginationMeta::for_params(pagination, total),
                ))
            })
            .await
    }

    #[instrument(skip(students, cancel))]
    pub async fn get(
        students: &dyn StudentRepository,
        id: StudentId,
        cancel: &CancelSignal,
    ) -> Outcome<Student> {
        cancel
            .run(async move {
                students
                    .find(id)
                    .await?
                    .ok_or_else(|| ErrorInfo::not_found("Student"))
            })
            .await
    }

    #[instrument(skip(students, rules, dto, cancel))]
    pub async fn update(
        students: &dyn StudentRepository,
        rules: &ValidationRules,
        id: StudentId,
        dto: UpdateStudentDto,
        cancel: &CancelSignal,
    ) -> Outcome<Student> {
        cancel
            .run(async move {
                check_phone(rules, dto.phone.as_deref())?;

                let mut student = students
                    .find(id)
                    .await?
                    .ok_or_else(|| ErrorInfo::not_found("Student"))?;
                dto.apply_to(&mut student);
                student.email = student.email.to_lowercase();
                student.updated_at = Utc::now();

                // Zero rows means it was deleted between the read and the write.
                if students.update(&student).await? == 0 {
                    return Err(ErrorInfo::not_found("Student"));
                }
                Ok(student)
            })
            .await
    }

    #[instrument(skip(students, cancel))]
    pub async fn delete(
        students: &dyn StudentRepository,
        id: StudentId,
        cancel: &CancelSignal,
    ) -> Outcome {
        cancel
            .run(async move {
                if students.delete(id).await? == 0 {
                    return Err(ErrorInfo::not_found("Student"));
                }
                info!(student_id = %id, "Student deleted");
                Ok(())
            })
            .await
    }
}
