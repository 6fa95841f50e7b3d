use pulsefit_auth::{JwtConfig, create_access_token, create_refresh_token, verify_refresh_token};
use pulsefit_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::users::model::User;

use super::model::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    /// Registers a new account. Accounts always start as unverified users;
    /// elevated roles are granted through the admin surface.
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(&dto.email)
                .fetch_optional(db)
                .await?;

        if existing.is_some() {
            return Err(AppError::bad_request("Email already exists"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, email, password) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, first_name, last_name, email, role, verified, created_at",
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, first_name, last_name, email, password, role, verified, created_at \
             FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        // The same message for unknown email and wrong password, so the
        // endpoint cannot be used to probe which addresses exist.
        if !verify_password(&dto.password, &row.password)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let access_token =
            create_access_token(row.id, &row.email, row.role, row.verified, jwt_config)
                .map_err(AppError::internal)?;
        let refresh_token =
            create_refresh_token(row.id, &row.email, jwt_config).map_err(AppError::internal)?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: row.into_user(),
        })
    }

    /// Exchanges a valid refresh token for a fresh access token.
    ///
    /// The account is re-read so the new token carries the user's current
    /// role and verification status, not the ones at login time.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_token(
        db: &PgPool,
        dto: RefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh_token, jwt_config)
            .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, role, verified, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        let access_token =
            create_access_token(user.id, &user.email, user.role, user.verified, jwt_config)
                .map_err(AppError::internal)?;

        Ok(RefreshResponse { access_token })
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, role, verified, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role: pulsefit_auth::Role,
    verified: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl UserWithPassword {
    fn into_user(self) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            verified: self.verified,
            created_at: self.created_at,
        }
    }
}
