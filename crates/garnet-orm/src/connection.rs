//! The executing connection.
//!
//! [`Connection`] owns a `sqlx` SQLite pool and a rendering dialect. It is
//! the only place in the workspace that performs I/O: queries built anywhere
//! else are handed here as `(sql, params)` pairs. Statement dispatch is a
//! `match` over [`QueryKind`]: SELECT fetches rows, everything else runs as
//! a write returning a success flag.

use garnet_core::{CompareOp, Comparison, Dialect, Query, QueryKind, SqlValue, ToSqlValue};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use crate::error::Result;
use crate::settings::ConnectionSettings;

/// Outcome of executing a query, by statement kind.
pub enum ExecuteResult {
    /// Rows fetched by a SELECT.
    Rows(Vec<SqliteRow>),
    /// Success flag for any other statement. `true` on success; failures
    /// propagate as errors instead of returning `false`.
    Done(bool),
}

impl ExecuteResult {
    /// Returns the fetched rows, or an empty list for non-SELECT results.
    #[must_use]
    pub fn into_rows(self) -> Vec<SqliteRow> {
        match self {
            Self::Rows(rows) => rows,
            Self::Done(_) => Vec::new(),
        }
    }
}

/// A database connection bound to one rendering dialect.
pub struct Connection<D: Dialect> {
    pool: SqlitePool,
    dialect: D,
}

impl<D: Dialect> Connection<D> {
    /// Opens a pooled connection from settings.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`](crate::OrmError::Database) when the pool cannot
    /// be established.
    pub async fn connect(settings: &ConnectionSettings, dialect: D) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.url)
            .await?;
        Ok(Self { pool, dialect })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: SqlitePool, dialect: D) -> Self {
        Self { pool, dialect }
    }

    /// The rendering dialect.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Starts a fluent query against the given table.
    #[must_use]
    pub fn table(&self, name: &str) -> BoundQuery<'_, D> {
        BoundQuery {
            connection: self,
            query: Query::new(name),
        }
    }

    /// Escapes a value as an inline SQL literal, for the rare contexts where
    /// parameter binding is unavailable.
    #[must_use]
    pub fn quote(&self, value: &SqlValue) -> String {
        value.to_literal()
    }

    /// Prepares and runs a read statement, returning the fetched rows.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`](crate::OrmError::Database) on driver failure.
    pub async fn run_select(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqliteRow>> {
        debug!(sql, "running select");
        let mut statement = sqlx::query(sql);
        for value in params {
            statement = bind_value(statement, value.clone());
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    /// Prepares and runs a write statement.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`](crate::OrmError::Database) on driver failure.
    pub async fn run_statement(&self, sql: &str, params: &[SqlValue]) -> Result<bool> {
        debug!(sql, "running statement");
        let mut statement = sqlx::query(sql);
        for value in params {
            statement = bind_value(statement, value.clone());
        }
        statement.execute(&self.pool).await?;
        Ok(true)
    }

    /// Renders a query with this connection's dialect and executes it,
    /// dispatching on the statement kind.
    ///
    /// # Errors
    ///
    /// Rendering errors surface before anything reaches the database; driver
    /// failures propagate unchanged.
    pub async fn execute(&self, query: &Query) -> Result<ExecuteResult> {
        let sql = query.build(&self.dialect)?;
        match query.kind() {
            QueryKind::Select => Ok(ExecuteResult::Rows(
                self.run_select(&sql, query.params()).await?,
            )),
            QueryKind::Insert
            | QueryKind::Update
            | QueryKind::Delete
            | QueryKind::CreateTable
            | QueryKind::AlterTable
            | QueryKind::DropTable => Ok(ExecuteResult::Done(
                self.run_statement(&sql, query.params()).await?,
            )),
        }
    }
}

/// Binds one value onto a prepared statement.
fn bind_value<'q>(
    statement: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match value {
        SqlValue::Null => statement.bind(Option::<i64>::None),
        SqlValue::Bool(b) => statement.bind(b),
        SqlValue::Int(i) => statement.bind(i),
        SqlValue::Float(f) => statement.bind(f),
        SqlValue::Text(s) => statement.bind(s),
        SqlValue::Blob(b) => statement.bind(b),
    }
}

/// A query under construction, bound to the connection that will execute it.
///
/// Forwards the whole builder API; no method performs I/O except
/// [`execute`](BoundQuery::execute).
pub struct BoundQuery<'c, D: Dialect> {
    connection: &'c Connection<D>,
    query: Query,
}

impl<D: Dialect> BoundQuery<'_, D> {
    /// Selects the given columns. An empty list selects `*`.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.query = self.query.select(columns);
        self
    }

    /// Selects all columns.
    #[must_use]
    pub fn select_all(mut self) -> Self {
        self.query = self.query.select_all();
        self
    }

    /// Inserts the given column/value pairs, in order.
    #[must_use]
    pub fn insert<S, V, I>(mut self, pairs: I) -> Self
    where
        S: Into<String>,
        V: ToSqlValue,
        I: IntoIterator<Item = (S, V)>,
    {
        self.query = self.query.insert(pairs);
        self
    }

    /// Updates the given column/value pairs, in order.
    #[must_use]
    pub fn update<S, V, I>(mut self, pairs: I) -> Self
    where
        S: Into<String>,
        V: ToSqlValue,
        I: IntoIterator<Item = (S, V)>,
    {
        self.query = self.query.update(pairs);
        self
    }

    /// Starts a DELETE statement.
    #[must_use]
    pub fn delete(mut self) -> Self {
        self.query = self.query.delete();
        self
    }

    /// Starts a DELETE statement with an initial constraint.
    #[must_use]
    pub fn delete_where(mut self, column: &str, op: CompareOp, value: impl ToSqlValue) -> Self {
        self.query = self.query.delete_where(column, op, value);
        self
    }

    /// Describes a CREATE TABLE statement.
    #[must_use]
    pub fn create_table(mut self, columns: Vec<garnet_core::Column>) -> Self {
        self.query = self.query.create_table(columns);
        self
    }

    /// Describes an ALTER TABLE statement.
    #[must_use]
    pub fn alter_table(
        mut self,
        added: Vec<garnet_core::Column>,
        altered: Vec<garnet_core::Column>,
        dropped: Vec<garnet_core::Column>,
    ) -> Self {
        self.query = self.query.alter_table(added, altered, dropped);
        self
    }

    /// Describes a DROP TABLE statement.
    #[must_use]
    pub fn drop_table(mut self) -> Self {
        self.query = self.query.drop_table();
        self
    }

    /// Appends an AND-joined equality constraint.
    #[must_use]
    pub fn where_eq(mut self, column: &str, value: impl ToSqlValue) -> Self {
        self.query = self.query.where_eq(column, value);
        self
    }

    /// Appends an AND-joined comparison constraint.
    #[must_use]
    pub fn where_cmp(mut self, column: &str, op: CompareOp, value: impl ToSqlValue) -> Self {
        self.query = self.query.where_cmp(column, op, value);
        self
    }

    /// Appends an OR-joined equality constraint.
    #[must_use]
    pub fn or_eq(mut self, column: &str, value: impl ToSqlValue) -> Self {
        self.query = self.query.or_eq(column, value);
        self
    }

    /// Appends an OR-joined comparison constraint.
    #[must_use]
    pub fn or_cmp(mut self, column: &str, op: CompareOp, value: impl ToSqlValue) -> Self {
        self.query = self.query.or_cmp(column, op, value);
        self
    }

    /// Appends each comparison row, AND-joined.
    #[must_use]
    pub fn where_all<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Comparison>,
    {
        self.query = self.query.where_all(rows);
        self
    }

    /// Appends an AND-joined parenthesized group of constraints.
    #[must_use]
    pub fn where_group<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.query = self.query.where_group(f);
        self
    }

    /// Appends an OR-joined parenthesized group of constraints.
    #[must_use]
    pub fn or_group<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.query = self.query.or_group(f);
        self
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub fn limit(mut self, count: u64) -> Self {
        self.query = self.query.limit(count);
        self
    }

    /// Renders the query with the connection's dialect.
    ///
    /// # Errors
    ///
    /// Propagates rendering failures.
    pub fn build(&self) -> Result<String> {
        Ok(self.query.build(self.connection.dialect())?)
    }

    /// Executes the query on the owning connection.
    ///
    /// # Errors
    ///
    /// Propagates rendering and driver failures.
    pub async fn execute(self) -> Result<ExecuteResult> {
        self.connection.execute(&self.query).await
    }

    /// The accumulated query description.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }
}
