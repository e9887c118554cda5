//! Database pool setup and schema management

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Startup failure to reach the database
#[derive(Error, Debug)]
pub enum DbConnectError {
    #[error("could not connect to database after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to apply schema migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open the pool, retrying a fixed number of times with a fixed pause.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, DbConnectError> {
    let attempts = config.connect_retries.max(1);
    let interval = Duration::from_secs(config.connect_retry_interval_secs);
    let options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);

    let mut attempt = 1;
    loop {
        match options.clone().connect(&config.url).await {
            Ok(pool) => {
                tracing::info!(attempt, "Connected to database");
                return Ok(pool);
            }
            Err(source) if attempt >= attempts => {
                return Err(DbConnectError::RetriesExhausted { attempts, source });
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    "Database not reachable, retrying in {}s: {}",
                    interval.as_secs(),
                    e
                );
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
        }
    }
}

/// Create or upgrade the catalog tables.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbConnectError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}
