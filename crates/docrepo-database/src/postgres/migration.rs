//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use docrepo_core::error::{AppError, ErrorKind};

/// Create the `documents` table and its indexes if they are missing.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreWrite,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
