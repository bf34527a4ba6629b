use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Planned item {0} is already fulfilled for this day")]
    AlreadyFulfilled(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure came from the storage collaborator rather than the caller's input.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}
