//! The schema context.
//!
//! One [`SchemaContext`] holds the authoritative [`Table`] record per name
//! for the duration of a migration run, plus a registry of tables marked for
//! dropping. It is created by the caller and passed into each migration step
//! explicitly; there is no process-wide registry. Callers must serialize
//! migration runs, since a context is single-writer state.
//!
//! While a step runs, the context records each table it touched as a pending
//! change, in order. The runner drains those with
//! [`take_pending`](SchemaContext::take_pending), flushes the corresponding
//! diffs, and calls [`confirm`](SchemaContext::confirm) only once a diff has
//! actually been applied (or was vacuous), so a failed statement leaves the
//! declared state intact for a retry.

use crate::table::Table;

/// A table touched during a migration step, in touch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// The table was declared or altered and needs its diff applied.
    Apply(String),
    /// The table was dropped.
    Drop(String),
}

/// Owns declared table state across one migration run.
#[derive(Debug, Default)]
pub struct SchemaContext {
    tables: Vec<Table>,
    dropped: Vec<Table>,
    pending: Vec<PendingChange>,
}

impl SchemaContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table record, lazily creating it as new on first
    /// reference.
    pub fn table(&mut self, name: &str) -> &mut Table {
        let idx = match self.tables.iter().position(|t| t.name == name) {
            Some(idx) => idx,
            None => {
                self.tables.push(Table::new(name, true));
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx]
    }

    /// Runs a closure against a table and records an apply intent for it.
    ///
    /// This is the entry point migrations use:
    ///
    /// ```rust
    /// # use garnet_migrate::SchemaContext;
    /// # let mut schema = SchemaContext::new();
    /// schema.with_table("articles", |t| {
    ///     t.add_primary("id");
    ///     t.add_string("title");
    /// });
    /// ```
    pub fn with_table<F>(&mut self, name: &str, f: F)
    where
        F: FnOnce(&mut Table),
    {
        f(self.table(name));
        self.pending.push(PendingChange::Apply(String::from(name)));
    }

    /// Drops a table, recording a drop intent. A table that was never
    /// declared still gets a stub entry so the drop statement can be
    /// rendered.
    pub fn drop_table(&mut self, name: &str) {
        let table = match self.tables.iter().position(|t| t.name == name) {
            Some(idx) => self.tables.remove(idx),
            None => Table::new(name, false),
        };
        self.dropped.retain(|t| t.name != name);
        self.dropped.push(table);
        self.pending.push(PendingChange::Drop(String::from(name)));
    }

    /// Looks up a live table.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns whether a table is in the dropped registry.
    #[must_use]
    pub fn is_dropped(&self, name: &str) -> bool {
        self.dropped.iter().any(|t| t.name == name)
    }

    /// Drains the changes recorded since the last drain, in order.
    pub fn take_pending(&mut self) -> Vec<PendingChange> {
        std::mem::take(&mut self.pending)
    }

    /// Finalizes a successfully applied table diff.
    pub fn confirm(&mut self, name: &str) {
        if let Some(table) = self.tables.iter_mut().find(|t| t.name == name) {
            table.mark_applied();
        }
    }
}
