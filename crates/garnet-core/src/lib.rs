//! # garnet-core
//!
//! Portable SQL query descriptions and dialect-aware rendering.
//!
//! This crate is the foundation of the garnet workspace:
//!
//! - [`Query`]: a mutable, chainable description of one statement (kind,
//!   columns, predicate tree, limit, and the ordered parameter list).
//! - [`Predicate`]: the recursive AND/OR constraint tree behind `WHERE`.
//! - [`Column`] / [`ColumnType`]: engine-independent column declarations,
//!   shared with the migration engine.
//! - [`Dialect`]: renders a query to engine-specific SQL with positional
//!   placeholders. The composition algorithm lives in the trait's provided
//!   methods; a dialect only supplies its quote characters and type map.
//!
//! Nothing in this crate performs I/O. Execution lives in `garnet-orm`.
//!
//! # Example
//!
//! ```rust
//! use garnet_core::{AnsiDialect, CompareOp, Query, SqlValue};
//!
//! let query = Query::new("users")
//!     .select(&["id"])
//!     .where_cmp("age", CompareOp::Ge, 18)
//!     .or_group(|q| q.where_eq("vip", true).where_eq("active", true));
//!
//! assert_eq!(
//!     query.build(&AnsiDialect).unwrap(),
//!     r#"SELECT "users"."id" FROM "users" WHERE "users"."age">=? OR ("users"."vip"=? AND "users"."active"=?);"#
//! );
//! assert_eq!(query.params().len(), 3);
//! ```

pub mod dialect;
pub mod error;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod value;

pub use dialect::{AnsiDialect, Dialect, TypeMapping};
pub use error::QueryError;
pub use predicate::{BoolOp, CompareOp, Comparison, Predicate};
pub use query::{Query, QueryKind};
pub use schema::{Column, ColumnLength, ColumnType};
pub use value::{SqlValue, ToSqlValue};
