//! Declared table structure.
//!
//! A [`Table`] tracks the columns a migration run has declared for one
//! database table, split into the live list and the dropped list. A column
//! name appears in at most one of the two at any time.

use garnet_core::{Column, ColumnType};

/// A table as declared by migrations.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Whether the table has yet to be created in the live schema.
    pub is_new: bool,
    columns: Vec<Column>,
    dropped_columns: Vec<Column>,
}

impl Table {
    /// Creates a table record.
    #[must_use]
    pub fn new(name: impl Into<String>, is_new: bool) -> Self {
        Self {
            name: name.into(),
            is_new,
            columns: Vec::new(),
            dropped_columns: Vec::new(),
        }
    }

    /// Live columns, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Columns marked for dropping, in drop order.
    #[must_use]
    pub fn dropped_columns(&self) -> &[Column] {
        &self.dropped_columns
    }

    /// Adds a column, returning a mutable handle for further tweaks.
    ///
    /// A column with the same name replaces the existing declaration, and a
    /// pending drop of that name is cancelled.
    pub fn add_column(&mut self, column: Column) -> &mut Column {
        self.dropped_columns.retain(|c| c.name != column.name);

        let idx = match self.columns.iter().position(|c| c.name == column.name) {
            Some(idx) => {
                self.columns[idx] = column;
                idx
            }
            None => {
                self.columns.push(column);
                self.columns.len() - 1
            }
        };
        &mut self.columns[idx]
    }

    /// Adds an integer primary-key column.
    pub fn add_primary(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Integer).primary_key())
    }

    /// Adds an integer column.
    pub fn add_integer(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Integer))
    }

    /// Adds a small-integer column.
    pub fn add_small_integer(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::SmallInt))
    }

    /// Adds a decimal column with the given precision and scale.
    pub fn add_decimal(&mut self, name: &str, precision: u32, scale: u32) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Decimal).scaled(precision, scale))
    }

    /// Adds a float column.
    pub fn add_float(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Float))
    }

    /// Adds a bit column.
    pub fn add_bit(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Bit))
    }

    /// Adds a fixed-length character column.
    pub fn add_char(&mut self, name: &str, length: u32) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Character).length(length))
    }

    /// Adds a varchar column with the dialect's default length.
    pub fn add_string(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Varchar))
    }

    /// Adds an unbounded text column.
    pub fn add_text(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Text))
    }

    /// Adds a date column.
    pub fn add_date(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Date))
    }

    /// Adds a time column.
    pub fn add_time(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Time))
    }

    /// Adds a timestamp column.
    pub fn add_timestamp(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Timestamp))
    }

    /// Adds a boolean column.
    pub fn add_boolean(&mut self, name: &str) -> &mut Column {
        self.add_column(Column::new(name, ColumnType::Boolean))
    }

    /// Looks up a live column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a live column by name, mutably.
    #[must_use]
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Moves a live column into the dropped list. Unknown names are ignored.
    pub fn drop_column(&mut self, name: &str) {
        if let Some(idx) = self.columns.iter().position(|c| c.name == name) {
            let column = self.columns.remove(idx);
            self.dropped_columns.retain(|c| c.name != name);
            self.dropped_columns.push(column);
        }
    }

    /// Finalizes a flushed diff: clears every not-yet-applied flag and
    /// empties the dropped list.
    pub fn mark_applied(&mut self) {
        self.is_new = false;
        for column in &mut self.columns {
            column.mark_applied();
        }
        self.dropped_columns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_helpers_cover_types() {
        let mut table = Table::new("samples", true);
        table.add_primary("id");
        table.add_string("title");
        table.add_decimal("price", 8, 2);
        table.add_boolean("active");

        assert_eq!(table.columns().len(), 4);
        assert!(table.get_column("id").unwrap().primary_key);
        assert_eq!(
            table.get_column("price").unwrap().column_type,
            ColumnType::Decimal
        );
    }

    #[test]
    fn chained_tweaks_apply_in_place() {
        let mut table = Table::new("articles", true);
        table.add_string("title").length = Some(garnet_core::ColumnLength::Fixed(64));

        assert_eq!(
            table.get_column("title").unwrap().length,
            Some(garnet_core::ColumnLength::Fixed(64))
        );
    }

    #[test]
    fn drop_moves_to_dropped_list() {
        let mut table = Table::new("articles", false);
        table.add_string("legacy");
        table.drop_column("legacy");

        assert!(table.get_column("legacy").is_none());
        assert_eq!(table.dropped_columns().len(), 1);

        // Unknown names are a no-op.
        table.drop_column("ghost");
        assert_eq!(table.dropped_columns().len(), 1);
    }

    #[test]
    fn readding_cancels_pending_drop() {
        let mut table = Table::new("articles", false);
        table.add_string("title");
        table.drop_column("title");
        table.add_string("title");

        // A name appears in at most one of the two lists.
        assert!(table.get_column("title").is_some());
        assert!(table.dropped_columns().is_empty());
    }

    #[test]
    fn mark_applied_clears_state() {
        let mut table = Table::new("articles", true);
        table.add_primary("id");
        table.add_string("stale");
        table.drop_column("stale");

        table.mark_applied();
        assert!(!table.is_new);
        assert!(!table.get_column("id").unwrap().is_new);
        assert!(table.dropped_columns().is_empty());
    }
}
