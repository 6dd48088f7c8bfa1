//! Database migration command.
//!
//! Migrations are embedded from `crates/api/migrations/` at compile time and
//! applied in order. Running against an up-to-date database is a no-op.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let database_url =
        super::database_url().map_err(|_| MigrationError::MissingEnvVar("KIRANA_DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
