use axum::{Router, routing::get};

use super::controller::{create_plan, delete_plan, get_plan, list_plans, update_plan};
use crate::state::AppState;

pub fn init_plans_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/{id}", get(get_plan).put(update_plan).delete(delete_plan))
}
