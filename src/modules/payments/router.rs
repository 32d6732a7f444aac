use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_payment, record_payment};
use crate::state::AppState;

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(record_payment))
        .route("/{id}", get(get_payment))
}
