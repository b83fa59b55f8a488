use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DbConfig;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated")]
    Duplicate,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            StoreError::Duplicate
        } else {
            StoreError::Database(err)
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

/// Open the pool, retrying with exponential backoff while the database is unreachable.
pub async fn connect_with_backoff(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let options = cfg.connect_options()?;
    let attempts = cfg.connect_attempts.max(1);
    let mut delay = Duration::from_millis(cfg.connect_backoff_ms);

    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout())
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                info!(attempt, "connected to database");
                return Ok(pool);
            }
            Err(e) if attempt >= attempts => {
                return Err(e).with_context(|| format!("connect to database after {attempts} attempts"));
            }
            Err(e) => {
                warn!(error = %e, attempt, retry_in_ms = delay.as_millis() as u64, "database connect failed");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
        }
    }
}

pub async fn run_migrations(db: &PgPool) {
    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(db).await {
        warn!(error = %e, "migration failed; continuing with existing schema");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_errors_stay_database_errors() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn duplicate_message_is_stable() {
        assert_eq!(StoreError::Duplicate.to_string(), "unique constraint violated");
    }
}
