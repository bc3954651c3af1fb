//! Migration execution.
//!
//! The runner walks registered migrations in order, replays their
//! declarations into a [`SchemaContext`], and flushes the resulting diffs
//! through the connection layer. A ledger table records each migration name
//! once it has been applied; already-recorded migrations are replayed into
//! the context (so later diffs see the right prior state) without executing
//! any SQL.
//!
//! Every walk expects a fresh context: planning and applying both consume the
//! context's diff state as they confirm tables.

use chrono::{DateTime, NaiveDateTime, Utc};
use garnet_core::{Column, ColumnType, CompareOp, Dialect, Query};
use garnet_orm::Connection;
use sqlx::Row;
use tracing::{debug, info, warn};

use crate::context::{PendingChange, SchemaContext};
use crate::diff::TableDiff;
use crate::error::{MigrateError, Result};
use crate::Migration;

/// Name of the bookkeeping table recording applied migrations.
pub const LEDGER_TABLE: &str = "garnet_migrations";

/// Walk direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply migrations.
    Up,
    /// Reverse migrations.
    Down,
}

/// Outcome of one runner walk.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Names of migrations whose changes were executed this walk.
    pub applied: Vec<String>,
    /// Every schema statement rendered during the walk, executed or not.
    pub statements: Vec<String>,
}

/// One row of the migration ledger.
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    /// Ledger row id.
    pub id: i64,
    /// Migration name.
    pub name: String,
    /// When the migration was recorded.
    pub applied_at: DateTime<Utc>,
}

/// Applies registered migrations through a connection.
pub struct MigrationRunner<D: Dialect> {
    connection: Connection<D>,
    migrations: Vec<Box<dyn Migration>>,
}

impl<D: Dialect> MigrationRunner<D> {
    /// Creates a runner with no registered migrations.
    #[must_use]
    pub fn new(connection: Connection<D>) -> Self {
        Self {
            connection,
            migrations: Vec::new(),
        }
    }

    /// Registers a migration. Registration order is execution order.
    #[must_use]
    pub fn register<M: Migration + 'static>(mut self, migration: M) -> Self {
        self.migrations.push(Box::new(migration));
        self
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection<D> {
        &self.connection
    }

    /// Applies all pending migrations in registration order.
    ///
    /// # Errors
    ///
    /// Propagates rendering and driver failures; on failure, the touched
    /// tables keep their unflushed state.
    pub async fn up(&self, ctx: &mut SchemaContext) -> Result<MigrationReport> {
        self.run(ctx, Direction::Up, true).await
    }

    /// Renders the SQL an [`up`](Self::up) walk would execute, without
    /// executing or recording anything.
    ///
    /// # Errors
    ///
    /// Propagates rendering failures and ledger-read failures.
    pub async fn plan(&self, ctx: &mut SchemaContext) -> Result<MigrationReport> {
        self.run(ctx, Direction::Up, false).await
    }

    /// Reverses applied migrations in reverse registration order, deleting
    /// their ledger rows so they can be reapplied.
    ///
    /// # Errors
    ///
    /// Propagates rendering and driver failures.
    pub async fn down(&self, ctx: &mut SchemaContext) -> Result<MigrationReport> {
        self.run(ctx, Direction::Down, true).await
    }

    /// Renders the SQL a [`down`](Self::down) walk would execute.
    ///
    /// # Errors
    ///
    /// Propagates rendering failures and ledger-read failures.
    pub async fn plan_down(&self, ctx: &mut SchemaContext) -> Result<MigrationReport> {
        self.run(ctx, Direction::Down, false).await
    }

    /// Walks registered migrations in the given direction. The `modify` flag
    /// controls whether schema changes are actually flushed to the
    /// connection; either way the rendered statements are reported.
    ///
    /// # Errors
    ///
    /// Propagates rendering and driver failures.
    pub async fn run(
        &self,
        ctx: &mut SchemaContext,
        direction: Direction,
        modify: bool,
    ) -> Result<MigrationReport> {
        self.ensure_ledger().await?;
        let mut report = MigrationReport::default();
        match direction {
            Direction::Up => {
                for migration in &self.migrations {
                    self.step(ctx, migration.as_ref(), direction, modify, &mut report)
                        .await?;
                }
            }
            Direction::Down => {
                for migration in self.migrations.iter().rev() {
                    self.step(ctx, migration.as_ref(), direction, modify, &mut report)
                        .await?;
                }
            }
        }
        Ok(report)
    }

    /// Runs a single migration resolved by name.
    ///
    /// # Errors
    ///
    /// [`MigrateError::Resolution`] when no registered migration has the
    /// given name; otherwise as [`run`](Self::run).
    pub async fn run_named(
        &self,
        ctx: &mut SchemaContext,
        name: &str,
        direction: Direction,
        modify: bool,
    ) -> Result<MigrationReport> {
        let migration = self
            .migrations
            .iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| MigrateError::Resolution {
                name: String::from(name),
            })?;

        self.ensure_ledger().await?;
        let mut report = MigrationReport::default();
        self.step(ctx, migration.as_ref(), direction, modify, &mut report)
            .await?;
        Ok(report)
    }

    /// Checks the ledger for a migration name.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn is_applied(&self, name: &str) -> Result<bool> {
        let rows = self
            .connection
            .table(LEDGER_TABLE)
            .select(&["name"])
            .where_eq("name", name)
            .limit(1)
            .execute()
            .await?
            .into_rows();
        Ok(!rows.is_empty())
    }

    /// Lists the ledger in application order.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn applied(&self) -> Result<Vec<AppliedMigration>> {
        let rows = self
            .connection
            .table(LEDGER_TABLE)
            .select(&["id", "name", "applied_at"])
            .execute()
            .await?
            .into_rows();

        Ok(rows
            .iter()
            .map(|row| {
                let raw: String = row.get("applied_at");
                let applied_at = DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
                            .map(|dt| dt.and_utc())
                    })
                    .unwrap_or_else(|_| Utc::now());
                AppliedMigration {
                    id: row.get("id"),
                    name: row.get("name"),
                    applied_at,
                }
            })
            .collect())
    }

    /// Ensures the ledger table exists, using the schema machinery itself.
    async fn ensure_ledger(&self) -> Result<()> {
        let columns = vec![
            Column::new("id", ColumnType::Integer).primary_key(),
            Column::new("name", ColumnType::Varchar),
            Column::new("applied_at", ColumnType::Timestamp).modifier("DEFAULT CURRENT_TIMESTAMP"),
        ];
        self.connection
            .table(LEDGER_TABLE)
            .create_table(columns)
            .execute()
            .await?;
        Ok(())
    }

    async fn record(&self, name: &str) -> Result<()> {
        self.connection
            .table(LEDGER_TABLE)
            .insert(vec![("name", name)])
            .execute()
            .await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.connection
            .table(LEDGER_TABLE)
            .delete_where("name", CompareOp::Eq, name)
            .execute()
            .await?;
        Ok(())
    }

    /// Runs one migration step and flushes the diffs it declared.
    async fn step(
        &self,
        ctx: &mut SchemaContext,
        migration: &dyn Migration,
        direction: Direction,
        modify: bool,
        report: &mut MigrationReport,
    ) -> Result<()> {
        let name = migration.name();
        let already = self.is_applied(name).await?;

        match direction {
            Direction::Up => {
                let execute = modify && !already;
                migration.up(ctx);
                self.flush(ctx, execute, report).await?;
                if execute {
                    self.record(name).await?;
                    report.applied.push(String::from(name));
                    info!(migration = name, "migration applied");
                } else if already {
                    debug!(migration = name, "already applied, replayed only");
                }
            }
            Direction::Down => {
                if !already {
                    warn!(migration = name, "not applied, skipping rollback");
                    return Ok(());
                }
                migration.down(ctx);
                self.flush(ctx, modify, report).await?;
                if modify {
                    self.remove(name).await?;
                    report.applied.push(String::from(name));
                    info!(migration = name, "migration rolled back");
                }
            }
        }
        Ok(())
    }

    /// Drains the context's pending changes, rendering each and executing
    /// when asked. A table is confirmed only after its statement has gone
    /// through (or turned out vacuous).
    async fn flush(
        &self,
        ctx: &mut SchemaContext,
        execute: bool,
        report: &mut MigrationReport,
    ) -> Result<()> {
        for change in ctx.take_pending() {
            match change {
                PendingChange::Apply(name) => {
                    let Some(table) = ctx.get(&name) else {
                        // Dropped later in the same step; the drop intent
                        // handles it.
                        continue;
                    };
                    if let Some(query) = TableDiff::plan(table).into_query() {
                        let sql = query.build(self.connection.dialect())?;
                        debug!(statement = sql.as_str(), "rendered schema change");
                        report.statements.push(sql.clone());
                        if execute {
                            self.connection.run_statement(&sql, query.params()).await?;
                        }
                    }
                    ctx.confirm(&name);
                }
                PendingChange::Drop(name) => {
                    let query = Query::new(name).drop_table();
                    let sql = query.build(self.connection.dialect())?;
                    debug!(statement = sql.as_str(), "rendered schema change");
                    report.statements.push(sql.clone());
                    if execute {
                        self.connection.run_statement(&sql, query.params()).await?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garnet_core::AnsiDialect;
    use sqlx::sqlite::SqlitePoolOptions;

    struct CreateArticles;

    impl Migration for CreateArticles {
        fn name(&self) -> &str {
            "create_articles"
        }

        fn up(&self, schema: &mut SchemaContext) {
            schema.with_table("articles", |t| {
                t.add_primary("id");
                t.add_string("title");
                t.add_text("content");
            });
        }

        fn down(&self, schema: &mut SchemaContext) {
            schema.drop_table("articles");
        }
    }

    struct AddArticlesAuthor;

    impl Migration for AddArticlesAuthor {
        fn name(&self) -> &str {
            "add_articles_author"
        }

        fn up(&self, schema: &mut SchemaContext) {
            schema.with_table("articles", |t| {
                t.add_integer("author");
            });
        }

        fn down(&self, schema: &mut SchemaContext) {
            schema.with_table("articles", |t| {
                t.drop_column("author");
            });
        }
    }

    async fn memory_connection() -> Connection<AnsiDialect> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("in-memory pool");
        Connection::from_pool(pool, AnsiDialect)
    }

    #[tokio::test]
    async fn up_applies_and_records() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let report = runner.up(&mut ctx).await.unwrap();

        assert_eq!(report.applied, vec!["create_articles"]);
        assert!(report.statements[0].contains("CREATE TABLE IF NOT EXISTS \"articles\""));
        assert!(runner.is_applied("create_articles").await.unwrap());

        // The table is live: a query against it succeeds.
        let rows = runner
            .connection()
            .table("articles")
            .select_all()
            .execute()
            .await
            .unwrap()
            .into_rows();
        assert!(rows.is_empty());

        // The context was confirmed.
        assert!(!ctx.get("articles").unwrap().is_new);
    }

    #[tokio::test]
    async fn second_up_replays_without_executing() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut first = SchemaContext::new();
        let _ = runner.up(&mut first).await.unwrap();

        let mut second = SchemaContext::new();
        let report = runner.up(&mut second).await.unwrap();

        assert!(report.applied.is_empty());
        // Replay still populates the context for later diffs.
        assert!(second.get("articles").is_some());
        assert!(!second.get("articles").unwrap().is_new);
    }

    #[tokio::test]
    async fn plan_reports_sql_without_touching_the_database() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let report = runner.plan(&mut ctx).await.unwrap();

        assert!(report.applied.is_empty());
        assert_eq!(report.statements.len(), 1);
        assert!(report.statements[0].contains("CREATE TABLE IF NOT EXISTS \"articles\""));

        // Nothing was executed or recorded.
        assert!(!runner.is_applied("create_articles").await.unwrap());
        assert!(runner
            .connection()
            .table("articles")
            .select_all()
            .execute()
            .await
            .is_err());
    }

    #[tokio::test]
    async fn down_unrecords_so_migration_can_reapply() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let _ = runner.up(&mut ctx).await.unwrap();
        assert!(runner.is_applied("create_articles").await.unwrap());

        let mut down_ctx = SchemaContext::new();
        let report = runner.down(&mut down_ctx).await.unwrap();
        assert_eq!(report.applied, vec!["create_articles"]);
        assert!(report.statements[0].contains("DROP TABLE IF EXISTS \"articles\""));
        assert!(!runner.is_applied("create_articles").await.unwrap());

        // The ledger row is gone, so the migration applies again.
        let mut again = SchemaContext::new();
        let report = runner.up(&mut again).await.unwrap();
        assert_eq!(report.applied, vec!["create_articles"]);
    }

    #[tokio::test]
    async fn down_skips_unapplied_migrations() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let report = runner.down(&mut ctx).await.unwrap();
        assert!(report.applied.is_empty());
        assert!(report.statements.is_empty());
    }

    #[tokio::test]
    async fn run_named_surfaces_unknown_migrations() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let err = runner
            .run_named(&mut ctx, "missing_migration", Direction::Up, true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Resolution { name } if name == "missing_migration"
        ));
    }

    #[tokio::test]
    async fn run_named_applies_a_single_migration() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let report = runner
            .run_named(&mut ctx, "create_articles", Direction::Up, true)
            .await
            .unwrap();
        assert_eq!(report.applied, vec!["create_articles"]);
        assert!(runner.is_applied("create_articles").await.unwrap());
    }

    #[tokio::test]
    async fn failed_apply_leaves_flags_intact() {
        // SQLite rejects the comma-joined MODIFY clauses the second
        // migration produces, standing in for any mid-walk failure.
        let runner = MigrationRunner::new(memory_connection().await)
            .register(CreateArticles)
            .register(AddArticlesAuthor);

        let mut ctx = SchemaContext::new();
        assert!(runner.up(&mut ctx).await.is_err());

        // The first migration went through.
        assert!(runner.is_applied("create_articles").await.unwrap());
        // The failed one was neither recorded nor confirmed: its column is
        // still flagged new, so the diff survives for a retry.
        assert!(!runner.is_applied("add_articles_author").await.unwrap());
        let author = ctx.get("articles").unwrap().get_column("author").unwrap();
        assert!(author.is_new);
    }

    #[tokio::test]
    async fn ledger_lists_applied_migrations() {
        let runner = MigrationRunner::new(memory_connection().await).register(CreateArticles);

        let mut ctx = SchemaContext::new();
        let _ = runner.up(&mut ctx).await.unwrap();

        let ledger = runner.applied().await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].name, "create_articles");
    }
}
