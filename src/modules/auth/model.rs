//! Authentication models, re-exported from `edudesk-models`.

pub use edudesk_models::auth::*;
pub use edudesk_models::users::{NewUser, Role, User, UserAccount};
