use axum::{Router, routing::get};

use super::controller::{
    create_student, delete_student, get_student, list_students, update_student,
};
use crate::modules::payments::controller::list_student_payments;
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/payments", get(list_student_payments))
}
