use crate::connection::Database;
use crate::error::Result;
use sqlx::migrate::{MigrateDatabase, Migrator};
use sqlx::{Pool, Sqlite};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,
    pub pending_migrations: usize,
}

/// Create the SQLite file behind `database_url` if it does not exist yet.
pub async fn create_database_if_not_exists(database_url: &str) -> Result<()> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    }
    Ok(())
}

pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    info!("Running database migrations");
    MIGRATOR.run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

pub async fn get_migration_status(pool: &Pool<Sqlite>) -> Result<MigrationStatus> {
    let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1")
        .fetch_all(pool)
        .await?;

    let pending = MIGRATOR.iter().filter(|m| !applied.contains(&m.version)).count();

    Ok(MigrationStatus { applied_migrations: applied.len(), pending_migrations: pending })
}

impl Database {
    pub async fn run_migrations(&self) -> Result<()> {
        run_migrations(self.pool()?).await
    }

    pub async fn verify_migrations(&self) -> Result<MigrationStatus> {
        let status = get_migration_status(self.pool()?).await?;
        info!(
            "Migrations applied: {}, pending: {}",
            status.applied_migrations, status.pending_migrations
        );
        Ok(status)
    }
}
