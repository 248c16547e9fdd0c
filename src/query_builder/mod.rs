//! # Query Builder
//!
//! Backend-neutral SQL statements the composition engine assembles before
//! handing them to a [`Backend`](crate::backend::Backend).
//!
//! ## Key Components
//!
//! - [`builder`] - `SelectQuery`, the statement every read operation composes
//! - [`conditions`] - WHERE clause building, including `IN (subquery)`
//! - [`joins`] - JOIN clause management (INNER, LEFT, CROSS, etc.)
//! - [`order`] - ORDER BY terms, including the pinned-value rank expression
//! - [`pagination`] - LIMIT/OFFSET windows
//! - [`mutations`] - INSERT/UPDATE/DELETE statements
//!
//! Every statement renders two ways: `build_sql()` inlines values as literals
//! for logging, `to_statement(dialect)` emits placeholders plus the values to
//! bind, in placeholder order.
//!
//! ## Example
//!
//! ```rust
//! use query_composer::query_builder::{Dialect, SelectQuery};
//! use serde_json::json;
//!
//! let query = SelectQuery::new("users")
//!     .inner_join("orders", "orders.user_id = users.id")
//!     .where_eq("orders.status", json!("paid"))
//!     .order_desc("users.id")
//!     .limit(20);
//!
//! let statement = query.to_statement(Dialect::Postgres);
//! assert!(statement.sql.contains("orders.status = $1"));
//! assert_eq!(statement.params, vec![json!("paid")]);
//! ```

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod mutations;
pub mod order;
pub mod pagination;
mod writer;

pub use builder::SelectQuery;
pub use conditions::{Condition, LogicalOperator, WhereClause};
pub use joins::{Join, JoinType};
pub use mutations::{DeleteStatement, InsertStatement, UpdateStatement};
pub use order::{OrderClause, OrderDirection};
pub use pagination::Pagination;
pub use writer::{Dialect, SqlStatement};
