use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{enroll, list_enrollments, program_content, update_progress};

pub fn init_my_router() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list_enrollments).post(enroll))
        .route("/enrollments/{id}/progress", patch(update_progress))
        .route("/programs/{id}/content", get(program_content))
}
