//! WHERE-clause predicate trees.
//!
//! A query's constraints form an ordered list of [`Predicate`] nodes: leaf
//! comparisons against a bound value, or parenthesized groups holding a
//! nested list. Each node carries the boolean operator that joins it to the
//! node *before* it; the first node of any list never contributes its
//! operator to the rendered SQL.
//!
//! Bound values are not stored in the tree. Every leaf appended to a query
//! pushes exactly one value onto the query's parameter list, so placeholder
//! positions and parameters stay in left-to-right, depth-first
//! correspondence.

use crate::error::QueryError;
use crate::value::SqlValue;

/// Comparison operators accepted in predicate leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `=`
    Eq,
}

impl CompareOp {
    /// Returns the SQL token for this operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "=",
        }
    }

    /// Parses an operator token, returning `None` for anything outside the
    /// recognized set.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            "=" => Some(Self::Eq),
            _ => None,
        }
    }
}

/// Boolean operator joining a predicate to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl BoolOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// One node in a predicate list.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A leaf comparison; its bound value lives in the owning query's
    /// parameter list.
    Compare {
        /// Column being compared.
        column: String,
        /// Comparison operator.
        op: CompareOp,
        /// Joins this node to the previous one in its list.
        bool_op: BoolOp,
    },
    /// A parenthesized sub-expression.
    Group {
        /// Nested predicate list; never empty.
        nodes: Vec<Predicate>,
        /// Joins this node to the previous one in its list.
        bool_op: BoolOp,
    },
}

impl Predicate {
    /// The operator joining this node to its predecessor.
    #[must_use]
    pub const fn bool_op(&self) -> BoolOp {
        match self {
            Self::Compare { bool_op, .. } | Self::Group { bool_op, .. } => *bool_op,
        }
    }
}

/// A single typed constraint row, as accepted by bulk predicate entry points.
///
/// `Pair(column, value)` is shorthand for `Triple(column, Eq, value)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Column equals value.
    Pair(String, SqlValue),
    /// Column compared to value with an explicit operator.
    Triple(String, CompareOp, SqlValue),
}

impl Comparison {
    /// Builds a comparison from a loosely structured row.
    ///
    /// The first element must be a textual column name. A two-element row is
    /// an equality check. In a three-element row the middle element is taken
    /// as the operator when it parses as one; otherwise it is taken as the
    /// compared value and the trailing element is discarded.
    ///
    /// # Errors
    ///
    /// [`QueryError::MalformedConstraint`] when the row has fewer than two
    /// elements or does not start with a column name.
    pub fn from_parts(parts: &[SqlValue]) -> Result<Self, QueryError> {
        if parts.len() < 2 {
            return Err(QueryError::MalformedConstraint);
        }

        let column = parts[0]
            .as_text()
            .ok_or(QueryError::MalformedConstraint)?
            .to_string();

        if parts.len() >= 3 {
            if let Some(op) = parts[1].as_text().and_then(CompareOp::parse) {
                return Ok(Self::Triple(column, op, parts[2].clone()));
            }
        }

        Ok(Self::Pair(column, parts[1].clone()))
    }

    /// Decomposes into `(column, operator, value)`, defaulting pairs to `=`.
    #[must_use]
    pub fn into_triple(self) -> (String, CompareOp, SqlValue) {
        match self {
            Self::Pair(column, value) => (column, CompareOp::Eq, value),
            Self::Triple(column, op, value) => (column, op, value),
        }
    }
}
