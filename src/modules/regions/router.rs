use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_region, delete_region, list_regions};
use crate::state::AppState;

pub fn init_regions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_regions).post(create_region))
        .route("/{id}", delete(delete_region))
}
