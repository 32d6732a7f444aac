use chrono::{DateTime, Utc};
use edudesk_auth::create_access_token;
use edudesk_config::{JwtConfig, LockoutPolicy, ValidationRules};
use edudesk_core::error_info::{PersistenceError, UserError};
use edudesk_core::{CancelSignal, ErrorInfo, Outcome, hash_password_with_cost, verify_password};
use edudesk_db::require_changes;
use edudesk_models::UserId;
use tracing::{info, instrument, warn};

use super::model::{
    ChangePasswordRequest, LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User,
};
use super::repository::UserRepository;
use crate::metrics;

fn password_too_short(rules: &ValidationRules) -> ErrorInfo {
    ErrorInfo::invalid_input(format!(
        "Password must be at least {} characters",
        rules.password_min_length
    ))
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, rules, dto, cancel), fields(email = %dto.email))]
    pub async fn register(
        users: &dyn UserRepository,
        rules: &ValidationRules,
        dto: RegisterRequest,
        cancel: &CancelSignal,
    ) -> Outcome<User> {
        cancel
            .run(async move {
                if !rules.password_is_acceptable(&dto.password) {
                    return Err(password_too_short(rules));
                }

                let email = dto.email.trim().to_lowercase();
                if users.find_by_email(&email).await?.is_some() {
                    return Err(UserError::AlreadyExists.into());
                }

                let password_hash = hash_password_with_cost(&dto.password, rules.password_hash_cost)?;
                let account = users
                    .insert(NewUser {
                        first_name: dto.first_name,
                        last_name: dto.last_name,
                        email,
                        password_hash,
                        role: dto.role.unwrap_or(Role::Staff),
                    })
                    .await
                    // Lost a race with a concurrent registration.
                    .map_err(|e| {
                        if e.is(PersistenceError::ConstraintViolation) {
                            UserError::AlreadyExists.into()
                        } else {
                            e
                        }
                    })?;

                info!(user_id = %account.id, role = %account.role, "User registered");
                Ok(User::from(account))
            })
            .await
    }

    /// Checks credentials and issues an access token.
    ///
    /// A locked account is rejected before its password is checked. Each
    /// wrong password bumps the failure counter in the store; the failure
    /// that reaches the policy's limit locks the account and reports
    /// `AttemptExceeded`, later ones report `Locked`.
    /// A successful login clears the counter.
    #[instrument(skip(users, jwt, lockout, dto, cancel), fields(email = %dto.email))]
    pub async fn login(
        users: &dyn UserRepository,
        jwt: &JwtConfig,
        lockout: &LockoutPolicy,
        dto: LoginRequest,
        now: DateTime<Utc>,
        cancel: &CancelSignal,
    ) -> Outcome<LoginResponse> {
        let outcome = cancel
            .run(async move {
                let email = dto.email.trim().to_lowercase();
                let Some(account) = users.find_by_email(&email).await? else {
                    return Err(UserError::InvalidCredentials.into());
                };

                if let Some(until) = account.locked_until.filter(|until| *until > now) {
                    return Err(ErrorInfo::user(UserError::Locked)
                        .with_message(format!("Account is locked until {}", until.to_rfc3339())));
                }

                if !verify_password(&dto.password, &account.password_hash)? {
                    let max_attempts = lockout.attempt_limit();
                    let failure = users
                        .record_failed_login(
                            account.id,
                            max_attempts,
                            now + lockout.lock_duration(),
                            now,
                        )
                        .await?;
                    let Some(failure) = failure else {
                        return Err(UserError::InvalidCredentials.into());
                    };

                    return Err(match failure.locked_until {
                        // A concurrent failure already locked the account.
                        Some(until) if failure.failed_login_attempts > max_attempts => {
                            ErrorInfo::user(UserError::Locked).with_message(format!(
                                "Account is locked until {}",
                                until.to_rfc3339()
                            ))
                        }
                        Some(_) => {
                            warn!(
                                user_id = %account.id,
                                attempts = failure.failed_login_attempts,
                                "Account locked after failed logins"
                            );
                            UserError::AttemptExceeded.into()
                        }
                        None => UserError::InvalidCredentials.into(),
                    });
                }

                if !account.is_active {
                    return Err(UserError::Inactive.into());
                }

                if account.failed_login_attempts > 0 || account.locked_until.is_some() {
                    users.reset_failed_logins(account.id).await?;
                }

                let access_token = create_access_token(
                    account.id.into_inner(),
                    &account.email,
                    account.role.as_str(),
                    account.role.permissions(),
                    jwt,
                )?;

                info!(user_id = %account.id, "User logged in");
                Ok(LoginResponse {
                    access_token,
                    token_type: "Bearer".to_string(),
                    expires_in: jwt.access_token_expiry,
                    user: User::from(account),
                })
            })
            .await;

        metrics::track_login(outcome.is_success());
        outcome
    }

    #[instrument(skip(users, cancel))]
    pub async fn profile(
        users: &dyn UserRepository,
        user_id: UserId,
        cancel: &CancelSignal,
    ) -> Outcome<User> {
        cancel
            .run(async move {
                users
                    .find_by_id(user_id)
                    .await?
                    .map(User::from)
                    .ok_or_else(|| UserError::NotFound.into())
            })
            .await
    }

    #[instrument(skip(users, rules, dto, cancel))]
    pub async fn change_password(
        users: &dyn UserRepository,
        rules: &ValidationRules,
        user_id: UserId,
        dto: ChangePasswordRequest,
        cancel: &CancelSignal,
    ) -> Outcome {
        cancel
            .run(async move {
                let account = users
                    .find_by_id(user_id)
                    .await?
                    .ok_or(UserError::NotFound)?;

                if !verify_password(&dto.current_password, &account.password_hash)? {
                    return Err(UserError::InvalidCredentials.into());
                }

                if !rules.password_is_acceptable(&dto.new_password) {
                    return Err(password_too_short(rules));
                }

                let password_hash =
                    hash_password_with_cost(&dto.new_password, rules.password_hash_cost)?;
                require_changes(users.update_password(user_id, &password_hash).await?)?;

                info!(user_id = %user_id, "Password changed");
                Ok(())
            })
            .await
    }
}
