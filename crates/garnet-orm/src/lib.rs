//! # garnet-orm
//!
//! The executing side of the garnet workspace: a pooled SQLite connection
//! that renders portable query descriptions through a dialect and runs them.
//!
//! Queries are started with [`Connection::table`] and stay pure data until
//! [`BoundQuery::execute`]:
//!
//! ```ignore
//! use garnet_core::{AnsiDialect, CompareOp};
//! use garnet_orm::{Connection, ConnectionSettings};
//!
//! let settings = ConnectionSettings::new("sqlite::memory:");
//! let conn = Connection::connect(&settings, AnsiDialect).await?;
//!
//! let rows = conn
//!     .table("users")
//!     .select(&["id", "name"])
//!     .where_cmp("age", CompareOp::Gt, 21)
//!     .limit(10)
//!     .execute()
//!     .await?
//!     .into_rows();
//! ```
//!
//! Statement dispatch follows the query's kind: SELECT returns rows, every
//! other statement returns a success flag. Failures are never interpreted
//! here; driver errors propagate to the caller unchanged.

mod connection;
mod error;
mod model;
mod settings;

pub use connection::{BoundQuery, Connection, ExecuteResult};
pub use error::{OrmError, Result};
pub use model::Model;
pub use settings::ConnectionSettings;
