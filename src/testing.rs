//! In-memory repositories for tests.
//!
//! [`InMemoryStore`] implements every repository port against plain vectors
//! behind a mutex, with the same uniqueness and foreign-key rules as the
//! PostgreSQL schema. Two knobs make failure paths reachable without a
//! database:
//!
//! - [`InMemoryStore::fail_next_write`] makes the next write fail with a
//!   given code, the way a rejected commit would.
//! - [`InMemoryStore::set_latency`] delays every call before it touches any
//!   data, so a canceled operation provably leaves no trace.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use edudesk_auth::create_access_token;
use edudesk_config::{CorsConfig, JwtConfig, LockoutPolicy, ValidationRules};
use edudesk_core::error_info::PersistenceError;
use edudesk_core::{ErrorCode, ErrorInfo, hash_password_with_cost};
use edudesk_models::attendance::{AttendanceEntry, AttendanceRecord, AttendanceStatus};
use edudesk_models::payments::{Payment, RecordPaymentDto};
use edudesk_models::plans::{CreatePlanDto, Plan};
use edudesk_models::regions::Region;
use edudesk_models::sessions::{ClassSession, CreateSessionDto};
use edudesk_models::settings::Settings;
use edudesk_models::students::{CreateStudentDto, Student};
use edudesk_models::users::NewUser;
use edudesk_models::{
    AttendanceId, PaymentId, PlanId, RegionId, Role, SessionId, StudentId, UserAccount, UserId,
};

use crate::modules::attendance::repository::AttendanceRepository;
use crate::modules::auth::repository::{FailedLogin, UserRepository};
use crate::modules::payments::repository::PaymentRepository;
use crate::modules::plans::repository::PlanRepository;
use crate::modules::regions::repository::RegionRepository;
use crate::modules::sessions::repository::SessionRepository;
use crate::modules::settings::repository::SettingsRepository;
use crate::modules::students::repository::{StudentFilter, StudentRepository};
use crate::router::init_router;
use crate::state::{AppState, Repositories};

/// bcrypt's minimum cost, so tests hash quickly.
pub const TEST_HASH_COST: u32 = 4;

#[derive(Default)]
struct Tables {
    users: Vec<UserAccount>,
    students: Vec<Student>,
    plans: Vec<Plan>,
    sessions: Vec<ClassSession>,
    attendance: Vec<AttendanceRecord>,
    payments: Vec<Payment>,
    regions: Vec<Region>,
    settings: Settings,
}

fn violation(message: &str) -> ErrorInfo {
    ErrorInfo::persistence(PersistenceError::ConstraintViolation).with_message(message)
}

fn page<T>(items: Vec<T>, limit: i64, offset: i64) -> (Vec<T>, i64) {
    let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    (items.into_iter().skip(offset).take(limit).collect(), total)
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    next_write_failure: Mutex<Option<ErrorCode>>,
    latency: Mutex<Option<Duration>>,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next write fails with `code` and changes nothing.
    pub fn fail_next_write(&self, code: impl Into<ErrorCode>) {
        *lock(&self.next_write_failure) = Some(code.into());
    }

    /// Delays every repository call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = Some(latency);
    }

    /// Number of writes that changed data.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn student_count(&self) -> usize {
        self.tables().students.len()
    }

    pub fn user(&self, email: &str) -> Option<UserAccount> {
        self.tables()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Moves an active lock into the past, as if its duration had elapsed.
    /// Returns the lock that was replaced.
    pub fn expire_lock(&self, email: &str) -> Option<DateTime<Utc>> {
        let mut tables = self.tables();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.email.eq_ignore_ascii_case(email))?;
        let until = user.locked_until?;
        user.locked_until = Some(Utc::now() - chrono::Duration::seconds(1));
        Some(until)
    }

    /// Inserts an active account with the given password.
    pub fn seed_user(&self, email: &str, password: &str, role: Role) -> Result<UserAccount, ErrorInfo> {
        let now = Utc::now();
        let account = UserAccount {
            id: UserId::new(),
            first_name: "Test".to_string(),
            last_name: role.as_str().to_string(),
            email: email.to_lowercase(),
            password_hash: hash_password_with_cost(password, TEST_HASH_COST)?,
            role,
            is_active: true,
            failed_login_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        };
        self.tables().users.push(account.clone());
        Ok(account)
    }

    pub fn deactivate_user(&self, id: UserId) {
        if let Some(user) = self.tables().users.iter_mut().find(|u| u.id == id) {
            user.is_active = false;
        }
    }

    pub fn seed_plan(&self, name: &str) -> Plan {
        let now = Utc::now();
        let plan = Plan {
            id: PlanId::new(),
            name: name.to_string(),
            description: None,
            price_cents: 12_000,
            sessions_per_week: 2,
            duration_weeks: 12,
            is_active: true,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.tables().plans.push(plan.clone());
        plan
    }

    pub fn seed_student(&self, first_name: &str, last_name: &str, email: &str) -> Student {
        let now = Utc::now();
        let student = Student {
            id: StudentId::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_lowercase(),
            phone: None,
            date_of_birth: None,
            region_id: None,
            plan_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables().students.push(student.clone());
        student
    }

    pub fn seed_region(&self, code: &str, name: &str) -> Region {
        let region = Region {
            id: RegionId::new(),
            code: code.to_uppercase(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables().regions.push(region.clone());
        region
    }

    pub fn seed_session(&self, plan_id: PlanId, title: &str, starts_at: DateTime<Utc>) -> ClassSession {
        let session = ClassSession {
            id: SessionId::new(),
            plan_id,
            title: title.to_string(),
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(1),
            location: None,
            created_at: Utc::now(),
        };
        self.tables().sessions.push(session.clone());
        session
    }

    pub fn seed_payment(&self, student_id: StudentId, amount_cents: i64, paid_on: NaiveDate) -> Payment {
        let payment = Payment {
            id: PaymentId::new(),
            student_id,
            amount_cents,
            method: edudesk_models::payments::PaymentMethod::Cash,
            paid_on,
            reference: None,
            created_at: Utc::now(),
        };
        self.tables().payments.push(payment.clone());
        payment
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }

    async fn pause(&self) {
        let latency = *lock(&self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Runs a mutation unless a failure was injected. Counts it when it
    /// changed at least one row.
    fn write<T>(
        &self,
        changed: impl Fn(&T) -> bool,
        mutate: impl FnOnce(&mut Tables) -> Result<T, ErrorInfo>,
    ) -> Result<T, ErrorInfo> {
        if let Some(code) = lock(&self.next_write_failure).take() {
            return Err(ErrorInfo::new(code));
        }
        let result = mutate(&mut self.tables())?;
        if changed(&result) {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(result)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn always<T>(_: &T) -> bool {
    true
}

fn nonzero(rows: &u64) -> bool {
    *rows > 0
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ErrorInfo> {
        self.pause().await;
        Ok(self.user(email))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, ErrorInfo> {
        self.pause().await;
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserAccount, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            if t.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                return Err(violation("users_email_key"));
            }
            let now = Utc::now();
            let account = UserAccount {
                id: UserId::new(),
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                is_active: true,
                failed_login_attempts: 0,
                locked_until: None,
                created_at: now,
                updated_at: now,
            };
            t.users.push(account.clone());
            Ok(account)
        })
    }

    async fn record_failed_login(
        &self,
        id: UserId,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<FailedLogin>, ErrorInfo> {
        self.pause().await;
        self.write(Option::is_some, |t| {
            Ok(t.users.iter_mut().find(|u| u.id == id).map(|user| {
                user.failed_login_attempts = match user.locked_until {
                    Some(until) if until <= now => 1,
                    _ => user.failed_login_attempts.saturating_add(1),
                };
                user.locked_until = (user.failed_login_attempts >= max_attempts).then_some(lock_until);
                user.updated_at = now;
                FailedLogin {
                    failed_login_attempts: user.failed_login_attempts,
                    locked_until: user.locked_until,
                }
            }))
        })
    }

    async fn reset_failed_logins(&self, id: UserId) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            Ok(t.users.iter_mut().find(|u| u.id == id).map_or(0, |user| {
                user.failed_login_attempts = 0;
                user.locked_until = None;
                1
            }))
        })
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            Ok(t.users.iter_mut().find(|u| u.id == id).map_or(0, |user| {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                1
            }))
        })
    }
}

fn check_student_refs(t: &Tables, student: &Student) -> Result<(), ErrorInfo> {
    if let Some(region_id) = student.region_id {
        if !t.regions.iter().any(|r| r.id == region_id) {
            return Err(violation("students_region_id_fkey"));
        }
    }
    if let Some(plan_id) = student.plan_id {
        if !t.plans.iter().any(|p| p.id == plan_id) {
            return Err(violation("students_plan_id_fkey"));
        }
    }
    if t
        .students
        .iter()
        .any(|s| s.id != student.id && s.email.eq_ignore_ascii_case(&student.email))
    {
        return Err(violation("students_email_key"));
    }
    Ok(())
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn insert(&self, dto: &CreateStudentDto) -> Result<Student, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            let now = Utc::now();
            let student = Student {
                id: StudentId::new(),
                first_name: dto.first_name.clone(),
                last_name: dto.last_name.clone(),
                email: dto.email.to_lowercase(),
                phone: dto.phone.clone(),
                date_of_birth: dto.date_of_birth,
                region_id: dto.region_id,
                plan_id: dto.plan_id,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            check_student_refs(t, &student)?;
            t.students.push(student.clone());
            Ok(student)
        })
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Student>, i64), ErrorInfo> {
        self.pause().await;
        let mut matches: Vec<Student> = self
            .tables()
            .students
            .iter()
            .filter(|s| filter.region_id.is_none() || s.region_id == filter.region_id)
            .filter(|s| filter.search.as_deref().is_none_or(|term| s.matches_search(term)))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id.0).cmp(&(&b.last_name, &b.first_name, b.id.0))
        });
        Ok(page(matches, limit, offset))
    }

    async fn find(&self, id: StudentId) -> Result<Option<Student>, ErrorInfo> {
        self.pause().await;
        Ok(self.tables().students.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, student: &Student) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            let Some(index) = t.students.iter().position(|s| s.id == student.id) else {
                return Ok(0);
            };
            check_student_refs(t, student)?;
            t.students[index] = student.clone();
            Ok(1)
        })
    }

    async fn delete(&self, id: StudentId) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            let before = t.students.len();
            t.students.retain(|s| s.id != id);
            t.attendance.retain(|a| a.student_id != id);
            t.payments.retain(|p| p.student_id != id);
            Ok(count(before - t.students.len()))
        })
    }

    async fn count_active(&self) -> Result<i64, ErrorInfo> {
        self.pause().await;
        let active = self.tables().students.iter().filter(|s| s.is_active).count();
        Ok(i64::try_from(active).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl PlanRepository for InMemoryStore {
    async fn insert(&self, dto: &CreatePlanDto) -> Result<Plan, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            let now = Utc::now();
            let plan = Plan {
                id: PlanId::new(),
                name: dto.name.clone(),
                description: dto.description.clone(),
                price_cents: dto.price_cents,
                sessions_per_week: dto.sessions_per_week,
                duration_weeks: dto.duration_weeks,
                is_active: true,
                version: 1,
                created_at: now,
                updated_at: now,
            };
            t.plans.push(plan.clone());
            Ok(plan)
        })
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Plan>, i64), ErrorInfo> {
        self.pause().await;
        let mut plans = self.tables().plans.clone();
        plans.sort_by(|a, b| (&a.name, a.id.0).cmp(&(&b.name, b.id.0)));
        Ok(page(plans, limit, offset))
    }

    async fn find(&self, id: PlanId) -> Result<Option<Plan>, ErrorInfo> {
        self.pause().await;
        Ok(self.tables().plans.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, plan: &Plan, expected_version: i32) -> Result<Option<Plan>, ErrorInfo> {
        self.pause().await;
        self.write(Option::is_some, |t| {
            let Some(stored) = t
                .plans
                .iter_mut()
                .find(|p| p.id == plan.id && p.version == expected_version)
            else {
                return Ok(None);
            };
            *stored = Plan {
                version: expected_version + 1,
                updated_at: Utc::now(),
                created_at: stored.created_at,
                ..plan.clone()
            };
            Ok(Some(stored.clone()))
        })
    }

    async fn delete(&self, id: PlanId) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            let before = t.plans.len();
            t.plans.retain(|p| p.id != id);
            let removed: Vec<SessionId> = t
                .sessions
                .iter()
                .filter(|s| s.plan_id == id)
                .map(|s| s.id)
                .collect();
            t.sessions.retain(|s| s.plan_id != id);
            t.attendance.retain(|a| !removed.contains(&a.session_id));
            for student in t.students.iter_mut().filter(|s| s.plan_id == Some(id)) {
                student.plan_id = None;
            }
            Ok(count(before - t.plans.len()))
        })
    }

    async fn count_active(&self) -> Result<i64, ErrorInfo> {
        self.pause().await;
        let active = self.tables().plans.iter().filter(|p| p.is_active).count();
        Ok(i64::try_from(active).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, dto: &CreateSessionDto) -> Result<ClassSession, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            if !t.plans.iter().any(|p| p.id == dto.plan_id) {
                return Err(violation("class_sessions_plan_id_fkey"));
            }
            let session = ClassSession {
                id: SessionId::new(),
                plan_id: dto.plan_id,
                title: dto.title.clone(),
                starts_at: dto.starts_at,
                ends_at: dto.ends_at,
                location: dto.location.clone(),
                created_at: Utc::now(),
            };
            t.sessions.push(session.clone());
            Ok(session)
        })
    }

    async fn find(&self, id: SessionId) -> Result<Option<ClassSession>, ErrorInfo> {
        self.pause().await;
        Ok(self.tables().sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassSession>, ErrorInfo> {
        self.pause().await;
        let mut sessions: Vec<ClassSession> = self
            .tables()
            .sessions
            .iter()
            .filter(|s| s.starts_within(from, to))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.starts_at, s.id.0));
        Ok(sessions)
    }

    async fn delete(&self, id: SessionId) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            let before = t.sessions.len();
            t.sessions.retain(|s| s.id != id);
            t.attendance.retain(|a| a.session_id != id);
            Ok(count(before - t.sessions.len()))
        })
    }

    async fn count_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64, ErrorInfo> {
        self.pause().await;
        let n = self
            .tables()
            .sessions
            .iter()
            .filter(|s| s.starts_within(from, to))
            .count();
        Ok(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn upsert(
        &self,
        session_id: SessionId,
        entries: &[AttendanceEntry],
        marked_at: DateTime<Utc>,
    ) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            if !t.sessions.iter().any(|s| s.id == session_id) {
                return Err(violation("attendance_session_id_fkey"));
            }
            // Checked up front so a bad entry leaves every record untouched.
            if entries
                .iter()
                .any(|e| !t.students.iter().any(|s| s.id == e.student_id))
            {
                return Err(violation("attendance_student_id_fkey"));
            }

            for entry in entries {
                match t
                    .attendance
                    .iter_mut()
                    .find(|a| a.session_id == session_id && a.student_id == entry.student_id)
                {
                    Some(record) => {
                        record.status = entry.status;
                        record.marked_at = marked_at;
                    }
                    None => t.attendance.push(AttendanceRecord {
                        id: AttendanceId::new(),
                        session_id,
                        student_id: entry.student_id,
                        status: entry.status,
                        marked_at,
                    }),
                }
            }
            Ok(count(entries.len()))
        })
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AttendanceRecord>, ErrorInfo> {
        self.pause().await;
        let mut records: Vec<AttendanceRecord> = self
            .tables()
            .attendance
            .iter()
            .filter(|a| a.session_id == session_id)
            .cloned()
            .collect();
        records.sort_by_key(|a| (a.marked_at, a.id.0));
        Ok(records)
    }

    async fn statuses_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AttendanceStatus>, ErrorInfo> {
        self.pause().await;
        let t = self.tables();
        Ok(t.attendance
            .iter()
            .filter(|a| {
                t.sessions
                    .iter()
                    .any(|s| s.id == a.session_id && s.starts_within(from, to))
            })
            .map(|a| a.status)
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn insert(&self, dto: &RecordPaymentDto) -> Result<Payment, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            if !t.students.iter().any(|s| s.id == dto.student_id) {
                return Err(violation("payments_student_id_fkey"));
            }
            let payment = Payment {
                id: PaymentId::new(),
                student_id: dto.student_id,
                amount_cents: dto.amount_cents,
                method: dto.method,
                paid_on: dto.paid_on,
                reference: dto.reference.clone(),
                created_at: Utc::now(),
            };
            t.payments.push(payment.clone());
            Ok(payment)
        })
    }

    async fn find(&self, id: PaymentId) -> Result<Option<Payment>, ErrorInfo> {
        self.pause().await;
        Ok(self.tables().payments.iter().find(|p| p.id == id).cloned())
    }

    async fn list_for_student(
        &self,
        student_id: StudentId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Payment>, i64), ErrorInfo> {
        self.pause().await;
        let mut payments: Vec<Payment> = self
            .tables()
            .payments
            .iter()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| (b.paid_on, b.created_at).cmp(&(a.paid_on, a.created_at)));
        Ok(page(payments, limit, offset))
    }

    async fn sum_between(&self, from: NaiveDate, to: NaiveDate) -> Result<i64, ErrorInfo> {
        self.pause().await;
        Ok(self
            .tables()
            .payments
            .iter()
            .filter(|p| p.paid_on >= from && p.paid_on <= to)
            .map(|p| p.amount_cents)
            .sum())
    }
}

#[async_trait]
impl RegionRepository for InMemoryStore {
    async fn insert(&self, code: &str, name: &str) -> Result<Region, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            if t.regions.iter().any(|r| r.code == code) {
                return Err(violation("regions_code_key"));
            }
            let region = Region {
                id: RegionId::new(),
                code: code.to_string(),
                name: name.to_string(),
                created_at: Utc::now(),
            };
            t.regions.push(region.clone());
            Ok(region)
        })
    }

    async fn list(&self) -> Result<Vec<Region>, ErrorInfo> {
        self.pause().await;
        let mut regions = self.tables().regions.clone();
        regions.sort_by(|a, b| (&a.name, &a.code).cmp(&(&b.name, &b.code)));
        Ok(regions)
    }

    async fn delete(&self, id: RegionId) -> Result<u64, ErrorInfo> {
        self.pause().await;
        self.write(nonzero, |t| {
            let before = t.regions.len();
            t.regions.retain(|r| r.id != id);
            for student in t.students.iter_mut().filter(|s| s.region_id == Some(id)) {
                student.region_id = None;
            }
            Ok(count(before - t.regions.len()))
        })
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn get(&self) -> Result<Settings, ErrorInfo> {
        self.pause().await;
        Ok(self.tables().settings.clone())
    }

    async fn update(&self, settings: &Settings) -> Result<Settings, ErrorInfo> {
        self.pause().await;
        self.write(always, |t| {
            t.settings = Settings {
                updated_at: Utc::now(),
                ..settings.clone()
            };
            Ok(t.settings.clone())
        })
    }
}

impl Repositories {
    /// Every port backed by the same in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            students: store.clone(),
            plans: store.clone(),
            sessions: store.clone(),
            attendance: store.clone(),
            payments: store.clone(),
            regions: store.clone(),
            settings: store,
        }
    }
}

/// State over `store` with fixed configuration: a known JWT secret, the
/// cheapest bcrypt cost and a three-strike lockout.
pub fn test_state(store: Arc<InMemoryStore>) -> AppState {
    AppState {
        repos: Repositories::in_memory(store),
        jwt_config: JwtConfig {
            secret: "test-secret".to_string(),
            issuer: "edudesk".to_string(),
            access_token_expiry: 3600,
        },
        cors_config: CorsConfig::default(),
        validation: ValidationRules {
            password_hash_cost: TEST_HASH_COST,
            ..ValidationRules::default()
        },
        lockout: LockoutPolicy {
            max_attempts: 3,
            lock_duration_secs: 900,
        },
    }
}

/// The full application router over `store`.
pub fn test_app(store: Arc<InMemoryStore>) -> Router {
    init_router(test_state(store))
}

/// A bearer token for `account`, signed with the test state's secret.
pub fn token_for(state: &AppState, account: &UserAccount) -> Result<String, ErrorInfo> {
    create_access_token(
        account.id.into_inner(),
        &account.email,
        account.role.as_str(),
        account.role.permissions(),
        &state.jwt_config,
    )
}
