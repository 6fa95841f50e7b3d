use pulsefit_auth::{Identity, Role};
use pulsefit_core::{AppError, PaginationMeta, hash_password};
use pulsefit_query::{Predicate, Relation, Specification, push_where};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use super::model::{CreateUserDto, User, UserFilterParams, UserListResponse};

const ENROLLMENTS_OF_USER: Relation = Relation::new("enrollments", "user_id");

pub struct UserService;

impl UserService {
    /// Lists accounts matching the caller's filters.
    ///
    /// Filters go through the specification composer so the scope invariant
    /// holds uniformly, even though the route itself is admin-only.
    #[instrument(skip(db, params))]
    pub async fn list_users(
        db: &PgPool,
        caller: &Identity,
        params: UserFilterParams,
    ) -> Result<UserListResponse, AppError> {
        let spec = Specification::compose(
            caller,
            "id",
            [
                Predicate::equals_text("role::text", params.role.as_deref()),
                Predicate::search(
                    &["first_name", "last_name", "email"],
                    params.search.as_deref(),
                ),
                Predicate::range("created_at", params.created_after, params.created_before),
                Predicate::has_related(ENROLLMENTS_OF_USER, params.has_enrollments),
                Predicate::min_related_count(ENROLLMENTS_OF_USER, params.min_enrollments),
            ],
        );

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u");
        push_where(&mut count, "u", &spec);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT u.id, u.first_name, u.last_name, u.email, u.role, u.verified, u.created_at \
             FROM users u",
        );
        push_where(&mut query, "u", &spec);
        query.push(" ORDER BY u.created_at DESC, u.id DESC LIMIT ");
        query.push_bind(params.pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(params.pagination.offset());

        let users: Vec<User> = query.build_query_as().fetch_all(db).await?;

        Ok(UserListResponse {
            users,
            meta: PaginationMeta::new(
                total,
                params.pagination.limit(),
                params.pagination.offset(),
            ),
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or(Role::User);
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, email, password, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, first_name, last_name, email, role, verified, created_at",
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::bad_request("Email already exists")
            }
            _ => err.into(),
        })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, role, verified, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User with id {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn verify_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET verified = TRUE WHERE id = $1 \
             RETURNING id, first_name, last_name, email, role, verified, created_at",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User with id {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User with id {id} not found")));
        }

        Ok(())
    }
}
