//! Student persistence.

use async_trait::async_trait;
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, execute_in_unit, map_sqlx_error};
use edudesk_models::{RegionId, StudentId};
use sqlx::PgPool;

use super::model::{CreateStudentDto, Student};

/// Optional list filters; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub region_id: Option<RegionId>,
    /// Matched case-insensitively against names and email
    pub search: Option<String>,
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, dto: &CreateStudentDto) -> Result<Student, ErrorInfo>;

    /// One page of matching students ordered by last name, first name, plus
    /// the total number of matches.
    async fn list(
        &self,
        filter: &StudentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Student>, i64), ErrorInfo>;

    async fn find(&self, id: StudentId) -> Result<Option<Student>, ErrorInfo>;

    async fn update(&self, student: &Student) -> Result<u64, ErrorInfo>;

    async fn delete(&self, id: StudentId) -> Result<u64, ErrorInfo>;

    async fn count_active(&self) -> Result<i64, ErrorInfo>;
}

const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, phone, date_of_birth, region_id, \
                               plan_id, is_active, created_at, updated_at";

const STUDENT_FILTER: &str = "($1::uuid IS NULL OR region_id = $1) \
                              AND ($2::text IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2 \
                              OR email ILIKE $2)";

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[derive(Clone)]
pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn insert(&self, dto: &CreateStudentDto) -> Result<Student, ErrorInfo> {
        let sql = format!(
            "INSERT INTO students (id, first_name, last_name, email, phone, date_of_birth, region_id, plan_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {STUDENT_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(StudentId::new())
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(dto.email.to_lowercase())
            .bind(&dto.phone)
            .bind(dto.date_of_birth)
            .bind(dto.region_id)
            .bind(dto.plan_id)
            .fetch_one(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(student)
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Student>, i64), ErrorInfo> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE {STUDENT_FILTER} \
             ORDER BY last_name, first_name, id LIMIT $3 OFFSET $4"
        );
        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(filter.region_id)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let count_sql = format!("SELECT COUNT(*) FROM students WHERE {STUDENT_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.region_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok((students, total))
    }

    async fn find(&self, id: StudentId) -> Result<Option<Student>, ErrorInfo> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(&self, student: &Student) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query(
                "UPDATE students SET first_name = $2, last_name = $3, email = $4, phone = $5, \
                 date_of_birth = $6, region_id = $7, plan_id = $8, is_active = $9, updated_at = $10 \
                 WHERE id = $1",
            )
            .bind(student.id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.email)
            .bind(&student.phone)
            .bind(student.date_of_birth)
            .bind(student.region_id)
            .bind(student.plan_id)
            .bind(student.is_active)
            .bind(student.updated_at),
        )
        .await
    }

    async fn delete(&self, id: StudentId) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query("DELETE FROM students WHERE id = $1").bind(id),
        )
        .await
    }

    async fn count_active(&self) -> Result<i64, ErrorInfo> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE is_active")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
