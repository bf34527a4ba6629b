use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for timexp_common::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => timexp_common::Error::NotFound(msg),
            DbError::Duplicate(msg) => timexp_common::Error::Duplicate(msg),
            DbError::InvalidData(msg) => timexp_common::Error::InvalidInput(msg),
            DbError::Serialization(e) => timexp_common::Error::Serialization(e),
            other => timexp_common::Error::StoreUnavailable(other.to_string()),
        }
    }
}
