use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, map_sqlx_error};
use edudesk_models::{AttendanceId, SessionId};
use sqlx::PgPool;

use super::model::{AttendanceEntry, AttendanceRecord, AttendanceStatus};

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Inserts or overwrites one record per entry, all in one transaction.
    /// Returns the number of rows written.
    async fn upsert(
        &self,
        session_id: SessionId,
        entries: &[AttendanceEntry],
        marked_at: DateTime<Utc>,
    ) -> Result<u64, ErrorInfo>;

    async fn list_for_session(&self, session_id: SessionId)
    -> Result<Vec<AttendanceRecord>, ErrorInfo>;

    /// Statuses recorded for sessions starting in `[from, to)`.
    async fn statuses_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AttendanceStatus>, ErrorInfo>;
}

#[derive(Clone)]
pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    async fn upsert(
        &self,
        session_id: SessionId,
        entries: &[AttendanceEntry],
        marked_at: DateTime<Utc>,
    ) -> Result<u64, ErrorInfo> {
        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        for entry in entries {
            uow.execute(
                sqlx::query(
                    "INSERT INTO attendance (id, session_id, student_id, status, marked_at) \
                     VALUES ($1, $2, $3, $4, $5) \
                     ON CONFLICT (session_id, student_id) \
                     DO UPDATE SET status = EXCLUDED.status, marked_at = EXCLUDED.marked_at",
                )
                .bind(AttendanceId::new())
                .bind(session_id)
                .bind(entry.student_id)
                .bind(entry.status)
                .bind(marked_at),
            )
            .await?;
        }
        uow.save_changes().await
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AttendanceRecord>, ErrorInfo> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT id, session_id, student_id, status, marked_at FROM attendance \
             WHERE session_id = $1 ORDER BY marked_at, id",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn statuses_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AttendanceStatus>, ErrorInfo> {
        sqlx::query_scalar(
            "SELECT a.status FROM attendance a \
             JOIN class_sessions s ON s.id = a.session_id \
             WHERE s.starts_at >= $1 AND s.starts_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}
