use chrono::{DateTime, Utc};
use pulsefit_core::PaginationParams;
use pulsefit_core::de::{optional_bool, optional_f64, optional_i64};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Program {
    pub id: i64,
    pub instructor_id: i64,
    pub name: String,
    pub description: String,
    /// One of `beginner`, `intermediate`, `advanced`.
    pub difficulty: String,
    pub price: f64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DIFFICULTIES: &[&str] = &["beginner", "intermediate", "advanced"];

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProgramDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub difficulty: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProgramDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub difficulty: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub published: Option<bool>,
}

/// Filters for the public catalog, `GET /api/programs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilterParams {
    /// Case-insensitive substring match over name and description.
    pub search: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub max_price: Option<f64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Filters for the instructor surface, `GET /api/instructor/programs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorFilterParams {
    pub search: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_bool")]
    pub published: Option<bool>,
    /// Only programs with at least this many enrollments.
    #[serde(default, deserialize_with = "optional_i64")]
    pub min_enrollments: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramListResponse {
    pub programs: Vec<Program>,
    pub meta: pulsefit_core::PaginationMeta,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Review {
    pub id: i64,
    pub program_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewDto {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ProgramModule {
    pub id: i64,
    pub program_id: i64,
    pub name: String,
    pub position: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateModuleDto {
    #[validate(length(min = 1))]
    pub name: String,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Lesson {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub video_url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub position: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct LessonResource {
    pub id: i64,
    pub lesson_id: i64,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(url)]
    pub url: String,
}
