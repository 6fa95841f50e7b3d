use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_lesson, create_module, create_program, create_resource, create_review, delete_program,
    get_program, list_catalog, list_instructor_programs, list_modules, list_reviews,
    update_program,
};

/// Public catalog surface, mounted under `/api/programs`.
pub fn init_programs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_catalog))
        .route("/{id}", get(get_program))
        .route("/{id}/reviews", get(list_reviews).post(create_review))
}

/// Authoring surface, mounted under `/api/instructor`.
pub fn init_instructor_router() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_instructor_programs).post(create_program))
        .route(
            "/programs/{id}",
            axum::routing::put(update_program).delete(delete_program),
        )
        .route("/programs/{id}/modules", get(list_modules).post(create_module))
        .route("/modules/{id}/lessons", post(create_lesson))
        .route("/lessons/{id}/resources", post(create_resource))
}
