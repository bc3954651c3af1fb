//! Schema diffing.
//!
//! [`TableDiff::plan`] reconciles a declared [`Table`] against what the live
//! schema is known to hold, producing the column change sets for a single
//! statement. Planning is pure: flags are cleared separately, by
//! [`SchemaContext::confirm`](crate::SchemaContext::confirm), once the
//! statement has actually been applied.

use garnet_core::{Column, Query};

use crate::table::Table;

/// The minimal statement-level change for one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableDiff {
    /// The table does not exist yet; create it with all declared columns.
    Create {
        /// Table name.
        table: String,
        /// Full column list.
        columns: Vec<Column>,
    },
    /// The table exists; apply column-level changes.
    ///
    /// Columns that were already live land in `altered` even when unchanged;
    /// the engine does not detect no-ops.
    Alter {
        /// Table name.
        table: String,
        /// Newly declared columns.
        added: Vec<Column>,
        /// Previously applied columns, re-stated.
        altered: Vec<Column>,
        /// Columns marked for dropping.
        dropped: Vec<Column>,
    },
    /// The table is being removed.
    Drop {
        /// Table name.
        table: String,
    },
    /// Nothing to do.
    Noop {
        /// Table name.
        table: String,
    },
}

impl TableDiff {
    /// Plans the change set for a declared table.
    #[must_use]
    pub fn plan(table: &Table) -> Self {
        if table.is_new {
            return Self::Create {
                table: table.name.clone(),
                columns: table.columns().to_vec(),
            };
        }

        let (added, altered): (Vec<Column>, Vec<Column>) =
            table.columns().iter().cloned().partition(|c| c.is_new);
        let dropped = table.dropped_columns().to_vec();

        if added.is_empty() && altered.is_empty() && dropped.is_empty() {
            return Self::Noop {
                table: table.name.clone(),
            };
        }

        Self::Alter {
            table: table.name.clone(),
            added,
            altered,
            dropped,
        }
    }

    /// Plans the removal of a table.
    #[must_use]
    pub fn drop(table: impl Into<String>) -> Self {
        Self::Drop {
            table: table.into(),
        }
    }

    /// The table this diff concerns.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Create { table, .. }
            | Self::Alter { table, .. }
            | Self::Drop { table }
            | Self::Noop { table } => table,
        }
    }

    /// Renders the diff as an executable query description, or `None` when
    /// there is nothing to do.
    #[must_use]
    pub fn into_query(self) -> Option<Query> {
        match self {
            Self::Create { table, columns } => Some(Query::new(table).create_table(columns)),
            Self::Alter {
                table,
                added,
                altered,
                dropped,
            } => Some(Query::new(table).alter_table(added, altered, dropped)),
            Self::Drop { table } => Some(Query::new(table).drop_table()),
            Self::Noop { .. } => None,
        }
    }
}
