//! MySQL dialect implementation.

use garnet_core::dialect::{Dialect, TypeMapping};
use garnet_core::schema::ColumnType;

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn type_mapping(&self, column_type: ColumnType) -> Option<TypeMapping> {
        Some(match column_type {
            ColumnType::Integer => TypeMapping::with_length("INT", 11),
            ColumnType::SmallInt => TypeMapping::with_length("SMALLINT", 6),
            ColumnType::Decimal => TypeMapping::keyword("DECIMAL"),
            ColumnType::Float => TypeMapping::keyword("FLOAT"),
            ColumnType::Bit => TypeMapping::with_length("BIT", 1),
            ColumnType::Character => TypeMapping::with_length("CHAR", 1),
            ColumnType::Varchar => TypeMapping::with_length("VARCHAR", 255),
            ColumnType::Text => TypeMapping::keyword("TEXT"),
            ColumnType::Date => TypeMapping::keyword("DATE"),
            ColumnType::Time => TypeMapping::keyword("TIME"),
            ColumnType::Timestamp => TypeMapping::keyword("TIMESTAMP"),
            ColumnType::Boolean => TypeMapping::with_length("TINYINT", 1),
        })
    }
}
