//! Error types for the connection layer.

use garnet_core::QueryError;

/// Errors raised while executing queries.
#[derive(Debug, thiserror::Error)]
pub enum OrmError {
    /// Driver-level failure; propagated, never interpreted.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The query could not be rendered.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A lookup by primary key matched no row.
    #[error("no row matched the primary key")]
    NotFound,
}

/// Result type for connection operations.
pub type Result<T> = std::result::Result<T, OrmError>;
