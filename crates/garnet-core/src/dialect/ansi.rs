//! ANSI SQL dialect.

use crate::schema::ColumnType;

use super::{Dialect, TypeMapping};

/// Standard-SQL dialect: double-quoted identifiers, portable type keywords.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiDialect;

impl AnsiDialect {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn type_mapping(&self, column_type: ColumnType) -> Option<TypeMapping> {
        Some(match column_type {
            ColumnType::Integer => TypeMapping::keyword("INTEGER"),
            ColumnType::SmallInt => TypeMapping::keyword("SMALLINT"),
            ColumnType::Decimal => TypeMapping::keyword("DECIMAL"),
            ColumnType::Float => TypeMapping::keyword("FLOAT"),
            ColumnType::Bit => TypeMapping::keyword("BIT"),
            ColumnType::Character => TypeMapping::with_length("CHAR", 1),
            ColumnType::Varchar => TypeMapping::with_length("VARCHAR", 255),
            ColumnType::Text => TypeMapping::keyword("TEXT"),
            ColumnType::Date => TypeMapping::keyword("DATE"),
            ColumnType::Time => TypeMapping::keyword("TIME"),
            ColumnType::Timestamp => TypeMapping::keyword("TIMESTAMP"),
            ColumnType::Boolean => TypeMapping::keyword("BOOLEAN"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    #[test]
    fn quotes_are_standard() {
        let d = AnsiDialect::new();
        assert_eq!(d.name(), "ansi");
        assert_eq!(d.identifier_quotes(), ('"', '"'));
    }

    #[test]
    fn every_type_is_mapped() {
        let d = AnsiDialect::new();
        for ty in [
            ColumnType::Integer,
            ColumnType::SmallInt,
            ColumnType::Decimal,
            ColumnType::Float,
            ColumnType::Bit,
            ColumnType::Character,
            ColumnType::Varchar,
            ColumnType::Text,
            ColumnType::Date,
            ColumnType::Time,
            ColumnType::Timestamp,
            ColumnType::Boolean,
        ] {
            assert!(d.type_mapping(ty).is_some(), "{ty:?} unmapped");
        }
    }

    #[test]
    fn varchar_defaults_to_255() {
        let d = AnsiDialect::new();
        let column = Column::new("name", ColumnType::Varchar);
        assert_eq!(d.render_type(&column).unwrap(), "VARCHAR(255)");
    }
}
