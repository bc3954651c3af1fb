//! Model glue.
//!
//! A [`Model`] names the table (and primary-key column) backing a Rust type,
//! which is enough for the connection to offer keyed lookups and inserts.
//! Full attribute mapping is intentionally not modeled here.

use garnet_core::{Dialect, ToSqlValue};
use sqlx::sqlite::SqliteRow;

use crate::connection::{BoundQuery, Connection};
use crate::error::{OrmError, Result};

/// A type backed by a database table.
pub trait Model {
    /// Backing table name.
    const TABLE: &'static str;

    /// Primary-key column name.
    const PRIMARY_KEY: &'static str = "id";
}

impl<D: Dialect> Connection<D> {
    /// Starts a fluent query against a model's table.
    #[must_use]
    pub fn model<M: Model>(&self) -> BoundQuery<'_, D> {
        self.table(M::TABLE)
    }

    /// Fetches the row matching a primary key, if any.
    ///
    /// # Errors
    ///
    /// Propagates rendering and driver failures.
    pub async fn find<M: Model, V: ToSqlValue>(&self, pk: V) -> Result<Option<SqliteRow>> {
        let mut rows = self
            .model::<M>()
            .select_all()
            .where_eq(M::PRIMARY_KEY, pk)
            .limit(1)
            .execute()
            .await?
            .into_rows();
        Ok(rows.pop())
    }

    /// Fetches the row matching a primary key, failing when none exists.
    ///
    /// # Errors
    ///
    /// [`OrmError::NotFound`] when no row matches; rendering and driver
    /// failures propagate.
    pub async fn get<M: Model, V: ToSqlValue>(&self, pk: V) -> Result<SqliteRow> {
        self.find::<M, V>(pk).await?.ok_or(OrmError::NotFound)
    }
}
