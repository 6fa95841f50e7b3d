use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use pulsefit_core::{AppError, PaginationParams};
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::programs::model::{
    CatalogFilterParams, CreateLessonDto, CreateModuleDto, CreateProgramDto, CreateResourceDto,
    CreateReviewDto, InstructorFilterParams, Lesson, LessonResource, Program, ProgramListResponse,
    ProgramModule, Review, UpdateProgramDto,
};
use crate::modules::programs::service::ProgramService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Browse the published program catalog
#[utoipa::path(
    get,
    path = "/api/programs",
    responses(
        (status = 200, description = "Paginated list of published programs", body = ProgramListResponse)
    ),
    tag = "Programs"
)]
#[instrument(skip(state, params))]
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogFilterParams>,
) -> Result<Json<ProgramListResponse>, AppError> {
    let response = ProgramService::list_catalog(&state.db, params).await?;
    Ok(Json(response))
}

/// Get a program by id
#[utoipa::path(
    get,
    path = "/api/programs/{id}",
    responses(
        (status = 200, description = "Program", body = Program),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Programs"
)]
#[instrument(skip(state, viewer))]
pub async fn get_program(
    State(state): State<AppState>,
    viewer: Option<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Program>, AppError> {
    let identity = viewer.as_ref().map(|v| &v.0);
    let program = ProgramService::get_program(&state.db, id, identity).await?;
    Ok(Json(program))
}

/// List reviews of a program
#[utoipa::path(
    get,
    path = "/api/programs/{id}/reviews",
    responses(
        (status = 200, description = "Reviews, newest first", body = Vec<Review>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Programs"
)]
#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = ProgramService::list_reviews(&state.db, id, pagination).await?;
    Ok(Json(reviews))
}

/// Review a program (enrolled users only)
#[utoipa::path(
    post,
    path = "/api/programs/{id}/reviews",
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 403, description = "Not enrolled", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Programs"
)]
#[instrument(skip(state, dto))]
pub async fn create_review(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = ProgramService::create_review(&state.db, &caller.0, id, dto).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// List the caller's own programs
#[utoipa::path(
    get,
    path = "/api/instructor/programs",
    responses(
        (status = 200, description = "Paginated list of the caller's programs", body = ProgramListResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state, params))]
pub async fn list_instructor_programs(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(params): Query<InstructorFilterParams>,
) -> Result<Json<ProgramListResponse>, AppError> {
    let response =
        ProgramService::list_instructor_programs(&state.db, &caller.0, params).await?;
    Ok(Json(response))
}

/// Create a program
#[utoipa::path(
    post,
    path = "/api/instructor/programs",
    request_body = CreateProgramDto,
    responses(
        (status = 201, description = "Program created", body = Program),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state, dto))]
pub async fn create_program(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateProgramDto>,
) -> Result<(StatusCode, Json<Program>), AppError> {
    let program = ProgramService::create_program(&state.db, &caller.0, dto).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

/// Update one of the caller's programs
#[utoipa::path(
    put,
    path = "/api/instructor/programs/{id}",
    request_body = UpdateProgramDto,
    responses(
        (status = 200, description = "Program updated", body = Program),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state, dto))]
pub async fn update_program(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateProgramDto>,
) -> Result<Json<Program>, AppError> {
    let program = ProgramService::update_program(&state.db, &caller.0, id, dto).await?;
    Ok(Json(program))
}

/// Delete one of the caller's programs
#[utoipa::path(
    delete,
    path = "/api/instructor/programs/{id}",
    responses(
        (status = 204, description = "Program deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state))]
pub async fn delete_program(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ProgramService::delete_program(&state.db, &caller.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a program's modules
#[utoipa::path(
    get,
    path = "/api/instructor/programs/{id}/modules",
    responses(
        (status = 200, description = "Modules in position order", body = Vec<ProgramModule>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state))]
pub async fn list_modules(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProgramModule>>, AppError> {
    let modules = ProgramService::list_modules(&state.db, &caller.0, id).await?;
    Ok(Json(modules))
}

/// Add a module to a program
#[utoipa::path(
    post,
    path = "/api/instructor/programs/{id}/modules",
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created", body = ProgramModule),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state, dto))]
pub async fn create_module(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateModuleDto>,
) -> Result<(StatusCode, Json<ProgramModule>), AppError> {
    let module = ProgramService::create_module(&state.db, &caller.0, id, dto).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

/// Add a lesson to a module
#[utoipa::path(
    post,
    path = "/api/instructor/modules/{id}/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state, dto))]
pub async fn create_lesson(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = ProgramService::create_lesson(&state.db, &caller.0, id, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

/// Attach a downloadable resource to a lesson
#[utoipa::path(
    post,
    path = "/api/instructor/lessons/{id}/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource created", body = LessonResource),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
#[instrument(skip(state, dto))]
pub async fn create_resource(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<LessonResource>), AppError> {
    let resource = ProgramService::create_resource(&state.db, &caller.0, id, dto).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}
