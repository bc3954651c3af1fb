//! The accumulating query builder.
//!
//! A [`Query`] collects intent (what kind of statement, which columns, the
//! predicate tree, a limit, and the ordered parameter list) without touching
//! a database. Rendering is delegated to a [`Dialect`]; execution belongs to
//! the connection layer. Builder methods consume and return the query to
//! support fluent chaining.
//!
//! # Example
//!
//! ```rust
//! use garnet_core::{AnsiDialect, CompareOp, Query};
//!
//! let query = Query::new("users")
//!     .select(&["id", "name"])
//!     .where_cmp("age", CompareOp::Gt, 21)
//!     .limit(10);
//!
//! let sql = query.build(&AnsiDialect).unwrap();
//! assert_eq!(
//!     sql,
//!     r#"SELECT "users"."id","users"."name" FROM "users" WHERE "users"."age">? LIMIT 10;"#
//! );
//! ```

use crate::dialect::Dialect;
use crate::error::Result;
use crate::predicate::{BoolOp, CompareOp, Comparison, Predicate};
use crate::schema::Column;
use crate::value::{SqlValue, ToSqlValue};

/// The kind of statement a query describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// `SELECT`
    Select,
    /// `INSERT`
    Insert,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
    /// `CREATE TABLE`
    CreateTable,
    /// `ALTER TABLE`
    AlterTable,
    /// `DROP TABLE`
    DropTable,
}

/// A portable description of a single SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    kind: QueryKind,
    columns: Vec<String>,
    column_defs: Vec<Column>,
    added: Vec<Column>,
    altered: Vec<Column>,
    dropped: Vec<Column>,
    predicates: Vec<Predicate>,
    limit: Option<u64>,
    params: Vec<SqlValue>,
}

impl Query {
    /// Starts a query against the given table. The kind defaults to SELECT.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: QueryKind::Select,
            columns: Vec::new(),
            column_defs: Vec::new(),
            added: Vec::new(),
            altered: Vec::new(),
            dropped: Vec::new(),
            predicates: Vec::new(),
            limit: None,
            params: Vec::new(),
        }
    }

    // ---- statement kind ----

    /// Selects the given columns. An empty list selects `*`.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.kind = QueryKind::Select;
        self.columns = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Selects all columns.
    #[must_use]
    pub fn select_all(self) -> Self {
        self.select(&[])
    }

    /// Inserts the given column/value pairs, in order.
    #[must_use]
    pub fn insert<S, V, I>(mut self, pairs: I) -> Self
    where
        S: Into<String>,
        V: ToSqlValue,
        I: IntoIterator<Item = (S, V)>,
    {
        self.kind = QueryKind::Insert;
        self.columns = Vec::new();
        self.params = Vec::new();
        for (column, value) in pairs {
            self.columns.push(column.into());
            self.params.push(value.to_sql_value());
        }
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
        self.kind = QueryKind::Update;
        self.columns = Vec::new();
        self.params = Vec::new();
        for (column, value) in pairs {
            self.columns.push(column.into());
            self.params.push(value.to_sql_value());
        }
        self
    }

    /// Starts a DELETE statement.
    #[must_use]
    pub fn delete(mut self) -> Self {
        self.kind = QueryKind::Delete;
        self
    }

    /// Starts a DELETE statement with an initial constraint.
    #[must_use]
    pub fn delete_where(self, column: &str, op: CompareOp, value: impl ToSqlValue) -> Self {
        self.delete().where_cmp(column, op, value)
    }

    /// Describes a CREATE TABLE statement with the given column definitions.
    #[must_use]
    pub fn create_table(mut self, columns: Vec<Column>) -> Self {
        self.kind = QueryKind::CreateTable;
        self.column_defs = columns;
        self
    }

    /// Describes an ALTER TABLE statement from column change sets.
    #[must_use]
    pub fn alter_table(
        mut self,
        added: Vec<Column>,
        altered: Vec<Column>,
        dropped: Vec<Column>,
    ) -> Self {
        self.kind = QueryKind::AlterTable;
        self.added = added;
        self.altered = altered;
        self.dropped = dropped;
        self
    }

    /// Describes a DROP TABLE statement.
    #[must_use]
    pub fn drop_table(mut self) -> Self {
        self.kind = QueryKind::DropTable;
        self
    }

    // ---- predicates ----

    /// Appends an AND-joined equality constraint.
    #[must_use]
    pub fn where_eq(self, column: &str, value: impl ToSqlValue) -> Self {
        self.where_cmp(column, CompareOp::Eq, value)
    }

    /// Appends an AND-joined comparison constraint.
    #[must_use]
    pub fn where_cmp(mut self, column: &str, op: CompareOp, value: impl ToSqlValue) -> Self {
        self.push_compare(column, op, BoolOp::And, value.to_sql_value());
        self
    }

    /// Appends an OR-joined equality constraint.
    #[must_use]
    pub fn or_eq(self, column: &str, value: impl ToSqlValue) -> Self {
        self.or_cmp(column, CompareOp::Eq, value)
    }

    /// Appends an OR-joined comparison constraint.
    #[must_use]
    pub fn or_cmp(mut self, column: &str, op: CompareOp, value: impl ToSqlValue) -> Self {
        self.push_compare(column, op, BoolOp::Or, value.to_sql_value());
        self
    }

    /// Appends each comparison row, AND-joined.
    #[must_use]
    pub fn where_all<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Comparison>,
    {
        for row in rows {
            let (column, op, value) = row.into_triple();
            self.push_compare(&column, op, BoolOp::And, value);
        }
        self
    }

    /// Appends an AND-joined parenthesized group of constraints.
    ///
    /// The closure receives a freshly owned builder for the same table and
    /// returns it populated; the parent absorbs its predicates as a single
    /// nested node. A group that ends up empty is discarded.
    #[must_use]
    pub fn where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_group(BoolOp::And, f)
    }

    /// Appends an OR-joined parenthesized group of constraints.
    #[must_use]
    pub fn or_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_group(BoolOp::Or, f)
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    // ---- rendering ----

    /// Renders the query to dialect-specific SQL.
    ///
    /// # Errors
    ///
    /// Propagates rendering failures, e.g.
    /// [`QueryError::InvalidDataType`](crate::QueryError::InvalidDataType)
    /// for a column type the dialect does not map.
    pub fn build<D: Dialect + ?Sized>(&self, dialect: &D) -> Result<String> {
        match self.kind {
            QueryKind::Select => dialect.compose_select(self),
            QueryKind::Insert => dialect.compose_insert(self),
            QueryKind::Update => dialect.compose_update(self),
            QueryKind::Delete => dialect.compose_delete(self),
            QueryKind::CreateTable => dialect.compose_create(self),
            QueryKind::AlterTable => dialect.compose_alter(self),
            QueryKind::DropTable => dialect.compose_drop(self),
        }
    }

    // ---- accessors ----

    /// Target table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Statement kind.
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Selected or affected column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column definitions for CREATE TABLE.
    #[must_use]
    pub fn column_defs(&self) -> &[Column] {
        &self.column_defs
    }

    /// Columns added by an ALTER TABLE.
    #[must_use]
    pub fn added(&self) -> &[Column] {
        &self.added
    }

    /// Columns altered by an ALTER TABLE.
    #[must_use]
    pub fn altered(&self) -> &[Column] {
        &self.altered
    }

    /// Columns dropped by an ALTER TABLE.
    #[must_use]
    pub fn dropped(&self) -> &[Column] {
        &self.dropped
    }

    /// The predicate tree.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The result cap, if any.
    #[must_use]
    pub const fn limit_count(&self) -> Option<u64> {
        self.limit
    }

    /// Bound parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    // ---- internals ----

    fn push_compare(&mut self, column: &str, op: CompareOp, bool_op: BoolOp, value: SqlValue) {
        self.predicates.push(Predicate::Compare {
            column: String::from(column),
            op,
            bool_op,
        });
        self.params.push(value);
    }

    fn push_group<F>(mut self, bool_op: BoolOp, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let child = f(Self::new(self.table.clone()));
        if !child.predicates.is_empty() {
            self.predicates.push(Predicate::Group {
                nodes: child.predicates,
                bool_op,
            });
            self.params.extend(child.params);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::schema::{Column, ColumnType};

    #[test]
    fn select_round_trip() {
        let query = Query::new("t")
            .select(&["id", "name"])
            .where_cmp("age", CompareOp::Gt, 21)
            .where_eq("name", "x")
            .limit(10);

        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"SELECT "t"."id","t"."name" FROM "t" WHERE "t"."age">? AND "t"."name"=? LIMIT 10;"#
        );
        assert_eq!(
            query.params(),
            &[SqlValue::Int(21), SqlValue::Text("x".into())]
        );
    }

    #[test]
    fn select_all_renders_star() {
        let query = Query::new("users").select_all();
        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"SELECT "users".* FROM "users";"#
        );
    }

    #[test]
    fn insert_flattens_pairs_in_order() {
        let query = Query::new("articles").insert(vec![("title", "hello"), ("content", "world")]);

        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"INSERT INTO "articles" ("title","content") VALUES (?,?);"#
        );
        assert_eq!(query.columns(), &["title", "content"]);
        assert_eq!(
            query.params(),
            &[
                SqlValue::Text("hello".into()),
                SqlValue::Text("world".into())
            ]
        );
    }

    #[test]
    fn update_params_precede_where_params() {
        let query = Query::new("articles")
            .update(vec![("title", "new")])
            .where_eq("id", 3);

        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"UPDATE "articles" SET "title"=? WHERE "articles"."id"=?;"#
        );
        assert_eq!(
            query.params(),
            &[SqlValue::Text("new".into()), SqlValue::Int(3)]
        );
    }

    #[test]
    fn delete_with_initial_constraint() {
        let query = Query::new("sessions").delete_where("expired", CompareOp::Eq, true);
        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"DELETE FROM "sessions" WHERE "sessions"."expired"=?;"#
        );
        assert_eq!(query.params(), &[SqlValue::Bool(true)]);
    }

    #[test]
    fn nested_group_parenthesizes() {
        let query = Query::new("t")
            .select_all()
            .where_eq("name", "a")
            .or_group(|q| q.where_cmp("age", CompareOp::Gt, 30).where_eq("name", "b"));

        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"SELECT "t".* FROM "t" WHERE "t"."name"=? OR ("t"."age">? AND "t"."name"=?);"#
        );
        // Depth-first, left-to-right parameter order.
        assert_eq!(
            query.params(),
            &[
                SqlValue::Text("a".into()),
                SqlValue::Int(30),
                SqlValue::Text("b".into())
            ]
        );
    }

    #[test]
    fn empty_group_is_discarded() {
        let query = Query::new("t").select_all().where_group(|q| q);
        assert!(query.predicates().is_empty());
        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"SELECT "t".* FROM "t";"#
        );
    }

    #[test]
    fn where_all_appends_with_and() {
        let rows = vec![
            Comparison::Pair("name".into(), SqlValue::Text("x".into())),
            Comparison::Triple("age".into(), CompareOp::Ge, SqlValue::Int(18)),
        ];
        let query = Query::new("t").select_all().where_all(rows);

        assert_eq!(
            query.build(&AnsiDialect).unwrap(),
            r#"SELECT "t".* FROM "t" WHERE "t"."name"=? AND "t"."age">=?;"#
        );
    }

    #[test]
    fn placeholder_count_matches_params() {
        let query = Query::new("t")
            .select_all()
            .where_eq("a", 1)
            .or_cmp("b", CompareOp::Lt, 2)
            .where_group(|q| q.where_eq("c", 3).or_eq("d", 4));

        let sql = query.build(&AnsiDialect).unwrap();
        let placeholders = sql.matches('?').count();
        assert_eq!(placeholders, query.params().len());
        assert_eq!(placeholders, 4);
    }

    #[test]
    fn create_table_dispatches() {
        let query = Query::new("articles").create_table(vec![
            Column::new("id", ColumnType::Integer).primary_key(),
            Column::new("title", ColumnType::Varchar),
        ]);
        assert_eq!(query.kind(), QueryKind::CreateTable);

        let sql = query.build(&AnsiDialect).unwrap();
        assert_eq!(
            sql,
            r#"CREATE TABLE IF NOT EXISTS "articles" ("id" INTEGER,"title" VARCHAR(255),PRIMARY KEY ("id"));"#
        );
    }
}
