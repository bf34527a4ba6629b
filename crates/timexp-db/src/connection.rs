use crate::error::{DbError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
    pub encryption_key: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "timexp.db".to_string(), encryption_key: None, max_connections: 5 }
    }
}

impl DatabaseConfig {
    pub fn at_path(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }

    /// Private in-memory database; a single connection so every query sees the same data.
    pub fn in_memory() -> Self {
        Self { path: IN_MEMORY.to_string(), encryption_key: None, max_connections: 1 }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}

#[derive(Clone)]
pub struct Database {
    pub pool: Option<Pool<Sqlite>>,
}

impl Database {
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let pool = Self::create_pool(&config).await?;

        Ok(Self { pool: Some(pool) })
    }

    async fn create_pool(config: &DatabaseConfig) -> Result<Pool<Sqlite>> {
        let url = if config.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            let path = Path::new(&config.path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                    info!("Created database directory: {}", parent.display());
                }
            }
            format!("sqlite://{}", config.path)
        };

        let mut options = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !config.is_in_memory() {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        if let Some(key) = &config.encryption_key {
            info!("Configuring SQLCipher encryption");
            options = options
                .pragma("key", format!("x'{}'", key))
                .pragma("cipher_page_size", "4096")
                .pragma("kdf_iter", "256000");
        } else if !config.is_in_memory() {
            warn!("Database encryption is not enabled");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        info!("Database connection pool created: {}", config.path);

        Ok(pool)
    }

    pub fn pool(&self) -> Result<&Pool<Sqlite>> {
        self.pool
            .as_ref()
            .ok_or_else(|| DbError::InvalidData("Database pool not initialized".to_string()))
    }

    pub async fn close(mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            info!("Database connection pool closed");
        }
    }
}
