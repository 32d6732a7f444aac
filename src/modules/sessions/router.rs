use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_session, delete_session, get_session, list_week_sessions};
use crate::modules::attendance::controller::{list_attendance, mark_attendance};
use crate::state::AppState;

pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/week/{year}/{week}", get(list_week_sessions))
        .route("/{id}", get(get_session).delete(delete_session))
        .route(
            "/{id}/attendance",
            get(list_attendance).put(mark_attendance),
        )
}
