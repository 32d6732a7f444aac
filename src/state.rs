use std::fmt;
use std::sync::Arc;

use edudesk_config::{CorsConfig, JwtConfig, LockoutPolicy, ValidationRules};
use sqlx::PgPool;

use crate::modules::attendance::repository::{AttendanceRepository, PgAttendanceRepository};
use crate::modules::auth::repository::{PgUserRepository, UserRepository};
use crate::modules::payments::repository::{PaymentRepository, PgPaymentRepository};
use crate::modules::plans::repository::{PgPlanRepository, PlanRepository};
use crate::modules::regions::repository::{PgRegionRepository, RegionRepository};
use crate::modules::sessions::repository::{PgSessionRepository, SessionRepository};
use crate::modules::settings::repository::{PgSettingsRepository, SettingsRepository};
use crate::modules::students::repository::{PgStudentRepository, StudentRepository};

/// One adapter per repository port.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub regions: Arc<dyn RegionRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            students: Arc::new(PgStudentRepository::new(pool.clone())),
            plans: Arc::new(PgPlanRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            attendance: Arc::new(PgAttendanceRepository::new(pool.clone())),
            payments: Arc::new(PgPaymentRepository::new(pool.clone())),
            regions: Arc::new(PgRegionRepository::new(pool.clone())),
            settings: Arc::new(PgSettingsRepository::new(pool)),
        }
    }
}

impl fmt::Debug for Repositories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub repos: Repositories,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub validation: ValidationRules,
    pub lockout: LockoutPolicy,
}

impl AppState {
    /// State with configuration read from the environment.
    pub fn from_env(repos: Repositories) -> Self {
        Self {
            repos,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            validation: ValidationRules::from_env(),
            lockout: LockoutPolicy::from_env(),
        }
    }
}
