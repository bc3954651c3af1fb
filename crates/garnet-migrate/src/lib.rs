//! # garnet-migrate
//!
//! Declarative schema migrations for the garnet workspace.
//!
//! A migration declares table shape against a [`SchemaContext`]; the diff
//! engine reconciles those declarations with the previously recorded state
//! and emits the minimal column-level statements; the [`MigrationRunner`]
//! renders them through the shared query builder and executes them over a
//! `garnet-orm` connection, tracking what has run in a ledger table.
//!
//! # Example
//!
//! ```rust
//! use garnet_migrate::{Migration, SchemaContext};
//!
//! struct CreateArticles;
//!
//! impl Migration for CreateArticles {
//!     fn name(&self) -> &str {
//!         "create_articles"
//!     }
//!
//!     fn up(&self, schema: &mut SchemaContext) {
//!         schema.with_table("articles", |t| {
//!             t.add_primary("id");
//!             t.add_string("title");
//!             t.add_text("content");
//!         });
//!     }
//!
//!     fn down(&self, schema: &mut SchemaContext) {
//!         schema.drop_table("articles");
//!     }
//! }
//! ```
//!
//! Running it:
//!
//! ```ignore
//! let runner = MigrationRunner::new(connection).register(CreateArticles);
//! let mut ctx = SchemaContext::new();
//! let report = runner.up(&mut ctx).await?;
//! ```

mod context;
mod diff;
mod error;
mod runner;
mod table;

pub use context::{PendingChange, SchemaContext};
pub use diff::TableDiff;
pub use error::{MigrateError, Result};
pub use runner::{
    AppliedMigration, Direction, MigrationReport, MigrationRunner, LEDGER_TABLE,
};
pub use table::Table;

/// One forward/backward schema change unit.
///
/// Implementations declare table shape through the context; they never touch
/// the database themselves. The runner decides whether the declarations are
/// flushed.
pub trait Migration: Send + Sync {
    /// Unique migration name, as recorded in the ledger.
    fn name(&self) -> &str;

    /// Declares the forward changes.
    fn up(&self, schema: &mut SchemaContext);

    /// Declares the reverse changes.
    fn down(&self, schema: &mut SchemaContext);
}

/// Convenient imports for migration authors.
pub mod prelude {
    pub use crate::{Migration, MigrationRunner, SchemaContext, Table};
    pub use garnet_core::{Column, ColumnLength, ColumnType};
}
