use appauth_db::{MigrationError, PoolError};
use appauth_types::CollaboratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("failed to check out a cache connection: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("cache database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl From<CacheError> for CollaboratorError {
    fn from(e: CacheError) -> Self {
        CollaboratorError::Cache(e.to_string())
    }
}
