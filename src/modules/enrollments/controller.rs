use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use pulsefit_core::AppError;
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, Enrollment, EnrollmentFilterParams, EnrollmentListResponse,
    ProgramContent, UpdateProgressDto,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Enroll into a published program
#[utoipa::path(
    post,
    path = "/api/my/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = Enrollment),
        (status = 400, description = "Already enrolled", body = ErrorResponse),
        (status = 404, description = "Program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "My"
)]
#[instrument(skip(state, dto))]
pub async fn enroll(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::enroll(&state.db, &caller.0, dto.program_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// List the caller's enrollments
#[utoipa::path(
    get,
    path = "/api/my/enrollments",
    responses(
        (status = 200, description = "Paginated list of enrollments", body = EnrollmentListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "My"
)]
#[instrument(skip(state, params))]
pub async fn list_enrollments(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(params): Query<EnrollmentFilterParams>,
) -> Result<Json<EnrollmentListResponse>, AppError> {
    let response = EnrollmentService::list_enrollments(&state.db, &caller.0, params).await?;
    Ok(Json(response))
}

/// Update progress on an enrollment
#[utoipa::path(
    patch,
    path = "/api/my/enrollments/{id}/progress",
    request_body = UpdateProgressDto,
    responses(
        (status = 200, description = "Enrollment updated", body = Enrollment),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "My"
)]
#[instrument(skip(state, dto))]
pub async fn update_progress(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateProgressDto>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment =
        EnrollmentService::update_progress(&state.db, &caller.0, id, dto.progress).await?;
    Ok(Json(enrollment))
}

/// Get the content tree of an enrolled program
#[utoipa::path(
    get,
    path = "/api/my/programs/{id}/content",
    responses(
        (status = 200, description = "Program with modules, lessons and resources", body = ProgramContent),
        (status = 403, description = "Not enrolled", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "My"
)]
#[instrument(skip(state))]
pub async fn program_content(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ProgramContent>, AppError> {
    let content = EnrollmentService::program_content(&state.db, &caller.0, id).await?;
    Ok(Json(content))
}
