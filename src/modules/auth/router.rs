use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{change_password, login, me, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/change-password", post(change_password))
}
