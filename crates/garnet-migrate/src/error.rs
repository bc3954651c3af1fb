//! Error types for the migration engine.

use garnet_core::QueryError;
use garnet_orm::OrmError;

/// Errors raised while planning or applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A migration was requested by name but never registered.
    #[error("migration '{name}' is not registered")]
    Resolution {
        /// The unresolved migration name.
        name: String,
    },

    /// Failure in the connection layer.
    #[error(transparent)]
    Orm(#[from] OrmError),

    /// A change set could not be rendered to SQL.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
