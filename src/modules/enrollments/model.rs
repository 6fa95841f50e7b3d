use chrono::{DateTime, Utc};
use pulsefit_core::PaginationParams;
use pulsefit_core::de::optional_i64;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::programs::model::{Lesson, LessonResource, Program, ProgramModule};

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    /// `active` or `completed`.
    pub status: String,
    /// Completion percentage, 0 to 100.
    pub progress: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentDto {
    #[validate(range(min = 1))]
    pub program_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProgressDto {
    #[validate(range(min = 0, max = 100))]
    pub progress: i32,
}

/// Filters for `GET /api/my/enrollments`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFilterParams {
    /// `active` or `completed`.
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub program_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentListResponse {
    pub enrollments: Vec<Enrollment>,
    pub meta: pulsefit_core::PaginationMeta,
}

/// A program with its full module/lesson/resource tree, as served to
/// enrolled members.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramContent {
    #[serde(flatten)]
    pub program: Program,
    pub modules: Vec<ModuleContent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleContent {
    #[serde(flatten)]
    pub module: ProgramModule,
    pub lessons: Vec<LessonContent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonContent {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub resources: Vec<LessonResource>,
}
