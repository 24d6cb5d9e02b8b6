use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{ENV, api::error, constants::Env};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let database_url = &ENV.database_url;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| error::SystemError::InternalError(Box::new(e)))?;
    log::info!("Database migrations applied");

    Ok(pool)
}

/// Token signing settings shared by the user service and the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub reset_token_expiration: u64,
}

impl AuthConfig {
    pub fn from_env(env: &Env) -> Self {
        Self {
            jwt_secret: env.jwt_secret.clone(),
            access_token_expiration: env.access_token_expiration,
            reset_token_expiration: env.reset_token_expiration,
        }
    }
}
