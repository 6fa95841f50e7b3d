//! Bootstrap commands. Admin accounts are never created through the API;
//! the first one comes from `pulsefit create-admin` on the host.

use pulsefit_auth::Role;
use pulsefit_core::hash_password;
use sqlx::PgPool;

pub async fn create_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {e:?}"))?;

    let result = sqlx::query(
        "INSERT INTO users (first_name, last_name, email, password, role, verified) \
         VALUES ($1, $2, $3, $4, $5, TRUE) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(hashed_password)
    .bind(Role::Admin)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
