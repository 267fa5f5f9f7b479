//! Process-wide PostgreSQL pool.
//!
//! The connection string is a secret and stays in `DATABASE_URL`; pool sizing is
//! read from the `[database]` settings.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracking::DatabaseConfig;

use crate::settings;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// The shared pool, connected on first use.
pub async fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

        let config = &settings::settings().database;
        tracing::info!(max_connections = config.max_connections, "database_connecting");
        pool_options(config).connect(&database_url).await
    })
    .await
}
