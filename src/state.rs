use std::sync::Arc;

use pulsefit_auth::{AccessMatrix, JwtConfig};
use sqlx::PgPool;

use crate::config::access::init_access_matrix;
use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;

/// Shared application state.
///
/// Everything here is immutable after startup; per-request data lives in
/// request extensions, never in this struct.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub access_matrix: Arc<AccessMatrix>,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        access_matrix: Arc::new(init_access_matrix()),
    }
}
