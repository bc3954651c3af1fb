//! SQL dialect rendering.
//!
//! A [`Dialect`] turns a portable [`Query`] description into one
//! engine-specific SQL string with positional `?` placeholders. The
//! composition algorithm is shared: implementations only supply identifier
//! quote characters and the semantic-type mapping table. Swapping those two
//! is all it takes to target another engine (MySQL uses backticks, for
//! instance).
//!
//! Rendering is pure (no dialect method touches a database) and every
//! failure is detected before any SQL text is returned.

mod ansi;

pub use ansi::AnsiDialect;

use crate::error::{QueryError, Result};
use crate::predicate::Predicate;
use crate::query::Query;
use crate::schema::{Column, ColumnLength, ColumnType};

/// How a dialect renders one semantic column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Rendered type keyword.
    pub keyword: &'static str,
    /// Length applied when the column declares none.
    pub default_length: Option<ColumnLength>,
}

impl TypeMapping {
    /// A keyword with no default length.
    #[must_use]
    pub const fn keyword(keyword: &'static str) -> Self {
        Self {
            keyword,
            default_length: None,
        }
    }

    /// A keyword with a default fixed length.
    #[must_use]
    pub const fn with_length(keyword: &'static str, length: u32) -> Self {
        Self {
            keyword,
            default_length: Some(ColumnLength::Fixed(length)),
        }
    }
}

/// A SQL dialect.
///
/// Only [`name`](Dialect::name), [`identifier_quotes`](Dialect::identifier_quotes)
/// and [`type_mapping`](Dialect::type_mapping) are dialect-specific; the
/// remaining methods implement the shared composition algorithm.
pub trait Dialect {
    /// Dialect name, used in error messages.
    fn name(&self) -> &'static str;

    /// Opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Maps a semantic type to its rendered keyword, or `None` when the
    /// dialect cannot express it.
    fn type_mapping(&self, column_type: ColumnType) -> Option<TypeMapping>;

    // ---- identifiers and lists ----

    /// Wraps a value in identifier quotes, optionally prefixing it with a
    /// quoted table name. The literal `*` is never quoted, though it may
    /// still be prefixed.
    fn quote_identifier(&self, value: &str, table: Option<&str>) -> String {
        let (open, close) = self.identifier_quotes();
        let quoted = if value == "*" {
            String::from(value)
        } else {
            format!("{open}{value}{close}")
        };
        match table {
            Some(t) => format!("{open}{t}{close}.{quoted}"),
            None => quoted,
        }
    }

    /// Renders a comma-joined column list, optionally table-prefixed and
    /// optionally parenthesized.
    fn column_list(&self, columns: &[String], table: Option<&str>, parentheses: bool) -> String {
        let list = columns
            .iter()
            .map(|c| self.quote_identifier(c, table))
            .collect::<Vec<_>>()
            .join(",");
        if parentheses {
            format!("({list})")
        } else {
            list
        }
    }

    /// Renders a column's type keyword with its effective length.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidDataType`] when the dialect has no mapping for
    /// the column's semantic type.
    fn render_type(&self, column: &Column) -> Result<String> {
        let mapping =
            self.type_mapping(column.column_type)
                .ok_or_else(|| QueryError::InvalidDataType {
                    column: column.name.clone(),
                    type_name: column.type_name(),
                    dialect: self.name(),
                })?;

        match column.length.or(mapping.default_length) {
            Some(length) => Ok(format!("{}({length})", mapping.keyword)),
            None => Ok(String::from(mapping.keyword)),
        }
    }

    /// Renders a full column definition: quoted name, type, modifiers.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidDataType`] when the type cannot be resolved.
    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut parts = vec![
            self.quote_identifier(&column.name, None),
            self.render_type(column)?,
        ];
        parts.extend(column.modifiers.iter().cloned());
        Ok(parts.join(" "))
    }

    /// Renders a comma-joined list of column definitions. When `with_keys`
    /// is set, primary-key columns contribute a trailing
    /// `PRIMARY KEY ("name")` clause.
    ///
    /// Every column's type is resolved before any text is assembled, so an
    /// unmapped type fails the whole list.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidDataType`] when any column's type cannot be
    /// resolved.
    fn typed_column_list(&self, columns: &[Column], with_keys: bool) -> Result<String> {
        let mut definitions = Vec::with_capacity(columns.len());
        let mut keys = Vec::new();
        for column in columns {
            definitions.push(self.column_definition(column)?);
            if with_keys && column.primary_key {
                keys.push(format!(
                    "PRIMARY KEY ({})",
                    self.quote_identifier(&column.name, None)
                ));
            }
        }
        definitions.extend(keys);
        Ok(definitions.join(","))
    }

    // ---- clause fragments ----

    /// Renders a predicate list, or `None` when it is empty.
    ///
    /// Leaves render as `"t"."col"<op>?`; groups render parenthesized. The
    /// boolean operator token appears before every node except the first of
    /// its list.
    fn render_where(&self, table: &str, nodes: &[Predicate], with_keyword: bool) -> Option<String> {
        if nodes.is_empty() {
            return None;
        }

        let mut tokens = Vec::new();
        for (idx, node) in nodes.iter().enumerate() {
            if idx > 0 {
                tokens.push(String::from(node.bool_op().token()));
            }
            match node {
                Predicate::Compare { column, op, .. } => tokens.push(format!(
                    "{}{}?",
                    self.quote_identifier(column, Some(table)),
                    op.symbol()
                )),
                Predicate::Group { nodes, .. } => tokens.push(format!(
                    "({})",
                    self.render_where(table, nodes, false).unwrap_or_default()
                )),
            }
        }

        let clause = tokens.join(" ");
        if with_keyword {
            Some(format!("WHERE {clause}"))
        } else {
            Some(clause)
        }
    }

    /// Renders `LIMIT n`, or `None` when no limit is set.
    fn render_limit(&self, limit: Option<u64>) -> Option<String> {
        limit.map(|n| format!("LIMIT {n}"))
    }

    /// Joins the non-empty fragments with single spaces and terminates the
    /// statement.
    fn compose(&self, fragments: Vec<Option<String>>) -> String {
        let joined = fragments
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        format!("{joined};")
    }

    // ---- statement composers ----

    /// Composes a SELECT statement.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the composer signatures
    /// uniform for dispatch.
    fn compose_select(&self, query: &Query) -> Result<String> {
        let columns = if query.columns().is_empty() {
            self.quote_identifier("*", Some(query.table()))
        } else {
            self.column_list(query.columns(), Some(query.table()), false)
        };

        Ok(self.compose(vec![
            Some(format!("SELECT {columns}")),
            Some(format!(
                "FROM {}",
                self.quote_identifier(query.table(), None)
            )),
            self.render_where(query.table(), query.predicates(), true),
            self.render_limit(query.limit_count()),
        ]))
    }

    /// Composes an INSERT statement.
    ///
    /// # Errors
    ///
    /// Currently infallible.
    fn compose_insert(&self, query: &Query) -> Result<String> {
        let placeholders = vec!["?"; query.columns().len()].join(",");

        Ok(self.compose(vec![
            Some(format!(
                "INSERT INTO {}",
                self.quote_identifier(query.table(), None)
            )),
            Some(self.column_list(query.columns(), None, true)),
            Some(format!("VALUES ({placeholders})")),
        ]))
    }

    /// Composes an UPDATE statement. SET targets are unqualified; WHERE
    /// columns keep the table prefix.
    ///
    /// # Errors
    ///
    /// Currently infallible.
    fn compose_update(&self, query: &Query) -> Result<String> {
        let assignments = query
            .columns()
            .iter()
            .map(|c| format!("{}=?", self.quote_identifier(c, None)))
            .collect::<Vec<_>>()
            .join(",");

        Ok(self.compose(vec![
            Some(format!(
                "UPDATE {}",
                self.quote_identifier(query.table(), None)
            )),
            Some(format!("SET {assignments}")),
            self.render_where(query.table(), query.predicates(), true),
        ]))
    }

    /// Composes a DELETE statement.
    ///
    /// # Errors
    ///
    /// Currently infallible.
    fn compose_delete(&self, query: &Query) -> Result<String> {
        Ok(self.compose(vec![
            Some(format!(
                "DELETE FROM {}",
                self.quote_identifier(query.table(), None)
            )),
            self.render_where(query.table(), query.predicates(), true),
            self.render_limit(query.limit_count()),
        ]))
    }

    /// Composes a CREATE TABLE IF NOT EXISTS statement.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidDataType`] when any column's type cannot be
    /// resolved; no SQL text is produced in that case.
    fn compose_create(&self, query: &Query) -> Result<String> {
        let definitions = self.typed_column_list(query.column_defs(), true)?;

        Ok(self.compose(vec![
            Some(format!(
                "CREATE TABLE IF NOT EXISTS {}",
                self.quote_identifier(query.table(), None)
            )),
            Some(format!("({definitions})")),
        ]))
    }

    /// Composes an ALTER TABLE statement with comma-joined
    /// ADD / MODIFY / DROP COLUMN clauses, in that order.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidDataType`] when any added or altered column's
    /// type cannot be resolved; no SQL text is produced in that case.
    fn compose_alter(&self, query: &Query) -> Result<String> {
        let mut clauses = Vec::new();
        for column in query.added() {
            clauses.push(format!("ADD COLUMN {}", self.column_definition(column)?));
        }
        for column in query.altered() {
            clauses.push(format!("MODIFY COLUMN {}", self.column_definition(column)?));
        }
        for column in query.dropped() {
            clauses.push(format!(
                "DROP COLUMN {}",
                self.quote_identifier(&column.name, None)
            ));
        }

        Ok(self.compose(vec![
            Some(format!(
                "ALTER TABLE {}",
                self.quote_identifier(query.table(), None)
            )),
            (!clauses.is_empty()).then(|| clauses.join(",")),
        ]))
    }

    /// Composes a DROP TABLE IF EXISTS statement.
    ///
    /// # Errors
    ///
    /// Currently infallible.
    fn compose_drop(&self, query: &Query) -> Result<String> {
        Ok(self.compose(vec![Some(format!(
            "DROP TABLE IF EXISTS {}",
            self.quote_identifier(query.table(), None)
        ))]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{BoolOp, CompareOp};
    use crate::query::Query;
    use crate::schema::{Column, ColumnType};

    /// Dialect mapping only INTEGER, for unmapped-type tests.
    struct SparseDialect;

    impl Dialect for SparseDialect {
        fn name(&self) -> &'static str {
            "sparse"
        }

        fn type_mapping(&self, column_type: ColumnType) -> Option<TypeMapping> {
            match column_type {
                ColumnType::Integer => Some(TypeMapping::keyword("INTEGER")),
                _ => None,
            }
        }
    }

    #[test]
    fn star_is_never_quoted() {
        let d = AnsiDialect;
        assert_eq!(d.quote_identifier("*", None), "*");
        assert_eq!(d.quote_identifier("*", Some("t")), r#""t".*"#);
        assert_eq!(d.quote_identifier("name", Some("t")), r#""t"."name""#);
    }

    #[test]
    fn empty_where_renders_nothing() {
        let d = AnsiDialect;
        assert_eq!(d.render_where("t", &[], true), None);
        assert_eq!(d.render_where("t", &[], false), None);
    }

    #[test]
    fn where_keyword_is_optional() {
        let d = AnsiDialect;
        let nodes = vec![Predicate::Compare {
            column: "age".into(),
            op: CompareOp::Gt,
            bool_op: BoolOp::And,
        }];
        assert_eq!(
            d.render_where("t", &nodes, true).unwrap(),
            r#"WHERE "t"."age">?"#
        );
        assert_eq!(
            d.render_where("t", &nodes, false).unwrap(),
            r#""t"."age">?"#
        );
    }

    #[test]
    fn no_leading_bool_op_at_any_level() {
        let d = AnsiDialect;
        let nodes = vec![
            Predicate::Compare {
                column: "a".into(),
                op: CompareOp::Eq,
                bool_op: BoolOp::Or,
            },
            Predicate::Group {
                nodes: vec![
                    Predicate::Compare {
                        column: "b".into(),
                        op: CompareOp::Eq,
                        bool_op: BoolOp::Or,
                    },
                    Predicate::Compare {
                        column: "c".into(),
                        op: CompareOp::Eq,
                        bool_op: BoolOp::And,
                    },
                ],
                bool_op: BoolOp::Or,
            },
        ];

        // The first node's OR is suppressed at both nesting levels.
        assert_eq!(
            d.render_where("t", &nodes, true).unwrap(),
            r#"WHERE "t"."a"=? OR ("t"."b"=? AND "t"."c"=?)"#
        );
    }

    #[test]
    fn limit_fragment() {
        let d = AnsiDialect;
        assert_eq!(d.render_limit(Some(10)).unwrap(), "LIMIT 10");
        assert_eq!(d.render_limit(None), None);
    }

    #[test]
    fn typed_column_list_collects_primary_keys() {
        let d = AnsiDialect;
        let columns = vec![
            Column::new("id", ColumnType::Integer).primary_key(),
            Column::new("title", ColumnType::Varchar),
        ];
        assert_eq!(
            d.typed_column_list(&columns, true).unwrap(),
            r#""id" INTEGER,"title" VARCHAR(255),PRIMARY KEY ("id")"#
        );
        // Without keys, the trailing clause is omitted.
        assert_eq!(
            d.typed_column_list(&columns, false).unwrap(),
            r#""id" INTEGER,"title" VARCHAR(255)"#
        );
    }

    #[test]
    fn column_definition_includes_modifiers() {
        let d = AnsiDialect;
        let column = Column::new("created_at", ColumnType::Timestamp)
            .modifier("DEFAULT CURRENT_TIMESTAMP");
        assert_eq!(
            d.column_definition(&column).unwrap(),
            r#""created_at" TIMESTAMP DEFAULT CURRENT_TIMESTAMP"#
        );
    }

    #[test]
    fn explicit_length_overrides_default() {
        let d = AnsiDialect;
        let column = Column::new("code", ColumnType::Varchar).length(32);
        assert_eq!(d.render_type(&column).unwrap(), "VARCHAR(32)");

        let scaled = Column::new("price", ColumnType::Decimal).scaled(8, 2);
        assert_eq!(d.render_type(&scaled).unwrap(), "DECIMAL(8,2)");
    }

    #[test]
    fn unmapped_type_fails_before_rendering() {
        let d = SparseDialect;
        let query = Query::new("t").create_table(vec![
            Column::new("id", ColumnType::Integer),
            Column::new("title", ColumnType::Text),
        ]);

        let err = query.build(&d).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidDataType {
                column: "title".into(),
                type_name: "Text".into(),
                dialect: "sparse",
            }
        );
    }

    #[test]
    fn alter_clause_order() {
        let d = AnsiDialect;
        let query = Query::new("articles").alter_table(
            vec![Column::new("author", ColumnType::Integer)],
            vec![Column::new("title", ColumnType::Varchar).applied()],
            vec![Column::new("legacy", ColumnType::Text).applied()],
        );

        assert_eq!(
            query.build(&d).unwrap(),
            r#"ALTER TABLE "articles" ADD COLUMN "author" INTEGER,MODIFY COLUMN "title" VARCHAR(255),DROP COLUMN "legacy";"#
        );
    }

    #[test]
    fn drop_uses_if_exists() {
        let d = AnsiDialect;
        let query = Query::new("articles").drop_table();
        assert_eq!(
            query.build(&d).unwrap(),
            r#"DROP TABLE IF EXISTS "articles";"#
        );
    }
}
