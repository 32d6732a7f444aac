use axum::{Router, routing::get};

use super::controller::get_week;
use crate::state::AppState;

pub fn init_calendar_router() -> Router<AppState> {
    Router::new().route("/weeks/{year}/{week}", get(get_week))
}
