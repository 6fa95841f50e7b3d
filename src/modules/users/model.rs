use chrono::{DateTime, Utc};
use pulsefit_auth::Role;
use pulsefit_core::PaginationParams;
use pulsefit_core::de::{optional_bool, optional_datetime, optional_i64};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Option<Role>,
}

/// Query parameters accepted by `GET /api/users`.
///
/// Every field is optional; blank or absent values fall out of the query
/// entirely rather than matching nothing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilterParams {
    /// Exact role match (`user`, `instructor`, `admin`).
    pub role: Option<String>,
    /// Case-insensitive substring match over name and email.
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub created_before: Option<DateTime<Utc>>,
    /// When true, only accounts with at least one enrollment.
    #[serde(default, deserialize_with = "optional_bool")]
    pub has_enrollments: Option<bool>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub min_enrollments: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub meta: pulsefit_core::PaginationMeta,
}
