//! Administrative operations behind the `edudesk-cli` binary.

use edudesk_config::ValidationRules;
use edudesk_core::{CancelSignal, Outcome};
use edudesk_models::auth::RegisterRequest;
use edudesk_models::{Role, User};

use crate::modules::auth::repository::UserRepository;
use crate::modules::auth::service::AuthService;

/// Details for a new administrator account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Creates an admin account through the same path as API registration, so
/// the same password rules and duplicate checks apply.
pub async fn create_admin(
    users: &dyn UserRepository,
    rules: &ValidationRules,
    admin: NewAdmin,
) -> Outcome<User> {
    let request = RegisterRequest {
        first_name: admin.first_name,
        last_name: admin.last_name,
        email: admin.email,
        password: admin.password,
        role: Some(Role::Admin),
    };
    AuthService::register(users, rules, request, &CancelSignal::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryStore, TEST_HASH_COST};
    use edudesk_core::error_info::UserError;

    fn admin(email: &str) -> NewAdmin {
        NewAdmin {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_admin_assigns_admin_role() {
        let store = InMemoryStore::new();
        let rules = ValidationRules {
            password_hash_cost: TEST_HASH_COST,
            ..ValidationRules::default()
        };

        let user = create_admin(store.as_ref(), &rules, admin("Ada@Example.com"))
            .await
            .into_value();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        let rules = ValidationRules {
            password_hash_cost: TEST_HASH_COST,
            ..ValidationRules::default()
        };
        create_admin(store.as_ref(), &rules, admin("ada@example.com")).await.into_value();

        let outcome = create_admin(store.as_ref(), &rules, admin("ada@example.com")).await;
        assert!(outcome.error().is(UserError::AlreadyExists));
    }
}
