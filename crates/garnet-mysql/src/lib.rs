//! # garnet-mysql
//!
//! MySQL dialect for `garnet-core`.
//!
//! # How MySQL differs from the ANSI dialect
//!
//! - **Identifier quoting**: MySQL quotes identifiers with backticks
//!   (`` ` ``) rather than double quotes.
//! - **Type keywords**: integer types carry display widths (`INT(11)`,
//!   `SMALLINT(6)`), and `BOOLEAN` is stored as `TINYINT(1)`.
//!
//! The composition algorithm itself is unchanged; this crate only swaps the
//! two dialect-specific inputs.
//!
//! ## Example
//!
//! ```rust
//! use garnet_core::Query;
//! use garnet_mysql::MySqlDialect;
//!
//! let sql = Query::new("users")
//!     .select(&["id"])
//!     .where_eq("name", "alice")
//!     .build(&MySqlDialect::new())
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT `users`.`id` FROM `users` WHERE `users`.`name`=?;");
//! ```

mod dialect;

pub use dialect::MySqlDialect;
