//! Application-level error type.

use domain::{DispatchError, DomainError, RepositoryError};
use thiserror::Error;

/// Errors surfaced by application services and startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// Entity validation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The repository rejected or failed the operation.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A handler failed while the event was dispatched.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Could not connect to the database.
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    /// Migrations failed at startup.
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    /// Returns true if the error is a missing aggregate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Repository(RepositoryError::NotFound { .. }))
    }
}
