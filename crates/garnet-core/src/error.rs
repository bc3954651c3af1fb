//! Error types for query construction and rendering.

/// Errors raised while building a query description or rendering it to SQL.
///
/// Both variants are detected eagerly, before any SQL text is returned to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A loose comparison row had fewer than two elements, or did not start
    /// with a column name.
    #[error("malformed comparison row: expected a column name followed by 1 or 2 elements")]
    MalformedConstraint,

    /// A column's semantic type has no mapping in the rendering dialect.
    #[error("column '{column}': type {type_name} is not mapped by the '{dialect}' dialect")]
    InvalidDataType {
        /// Column whose type failed to resolve.
        column: String,
        /// Name of the unmapped semantic type.
        type_name: String,
        /// Dialect that was asked to resolve it.
        dialect: &'static str,
    },
}

/// Result type for query building and rendering.
pub type Result<T> = std::result::Result<T, QueryError>;
