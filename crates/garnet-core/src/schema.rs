//! Declarative column descriptions.
//!
//! Columns are described in engine-independent terms: a semantic type, an
//! optional length, and an ordered list of modifier keywords. Dialects own
//! the mapping from semantic types to concrete SQL keywords.

use serde::{Deserialize, Serialize};

/// Engine-independent column types.
///
/// Rendering one of these requires the dialect to have a mapping for it; see
/// [`crate::dialect::Dialect::type_mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Integer.
    Integer,
    /// Small integer.
    SmallInt,
    /// Exact-precision decimal.
    Decimal,
    /// Floating point.
    Float,
    /// Bit field.
    Bit,
    /// Fixed-length character string.
    Character,
    /// Variable-length character string.
    Varchar,
    /// Unbounded text.
    Text,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Boolean.
    Boolean,
}

/// Length argument for a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnLength {
    /// A single size, e.g. `VARCHAR(255)`.
    Fixed(u32),
    /// Precision and scale, e.g. `DECIMAL(8,2)`.
    Scaled(u32, u32),
}

impl std::fmt::Display for ColumnLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Scaled(p, s) => write!(f, "{p},{s}"),
        }
    }
}

/// A declared column.
///
/// `is_new` tracks migration state: it is set on construction and cleared
/// only once the column's definition has been applied to the live schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Semantic type.
    pub column_type: ColumnType,
    /// Explicit length; `None` defers to the dialect's default for the type.
    pub length: Option<ColumnLength>,
    /// Ordered modifier keywords (e.g. `NOT NULL`, `DEFAULT CURRENT_TIMESTAMP`).
    pub modifiers: Vec<String>,
    /// Whether the column participates in the primary key.
    pub primary_key: bool,
    /// Whether the column has yet to be applied to the live schema.
    pub is_new: bool,
}

impl Column {
    /// Creates a new column of the given type, flagged as not yet applied.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            modifiers: Vec::new(),
            primary_key: false,
            is_new: true,
        }
    }

    /// Sets a fixed length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(ColumnLength::Fixed(length));
        self
    }

    /// Sets a precision/scale length.
    #[must_use]
    pub const fn scaled(mut self, precision: u32, scale: u32) -> Self {
        self.length = Some(ColumnLength::Scaled(precision, scale));
        self
    }

    /// Appends a modifier keyword.
    #[must_use]
    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    /// Appends `NOT NULL`.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.modifier("NOT NULL")
    }

    /// Marks the column as (part of) the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as already present in the live schema.
    #[must_use]
    pub const fn applied(mut self) -> Self {
        self.is_new = false;
        self
    }

    /// Clears the not-yet-applied flag in place.
    pub fn mark_applied(&mut self) {
        self.is_new = false;
    }

    /// Name of the semantic type, for error reporting.
    #[must_use]
    pub fn type_name(&self) -> String {
        format!("{:?}", self.column_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let col = Column::new("title", ColumnType::Varchar)
            .length(120)
            .not_null();

        assert_eq!(col.name, "title");
        assert_eq!(col.length, Some(ColumnLength::Fixed(120)));
        assert_eq!(col.modifiers, vec!["NOT NULL"]);
        assert!(col.is_new);
        assert!(!col.primary_key);
    }

    #[test]
    fn primary_and_applied_flags() {
        let col = Column::new("id", ColumnType::Integer).primary_key().applied();
        assert!(col.primary_key);
        assert!(!col.is_new);
    }

    #[test]
    fn scaled_length_display() {
        assert_eq!(ColumnLength::Fixed(255).to_string(), "255");
        assert_eq!(ColumnLength::Scaled(8, 2).to_string(), "8,2");
    }
}
