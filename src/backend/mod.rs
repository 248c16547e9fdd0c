//! # Relational Backends
//!
//! The boundary between the composition engine and the store. A backend
//! executes rendered statements; everything above it (joins, ordering,
//! aggregate wrapping, state handling) is backend-neutral.
//!
//! Implementations provide the row-fetching and execution primitives plus
//! their [`Dialect`]; the terminal operations the composer calls are provided
//! on top of them.

use crate::error::{RepositoryError, RepositoryResult};
use crate::query_builder::{
    DeleteStatement, Dialect, InsertStatement, SelectQuery, SqlStatement, UpdateStatement,
};
use crate::repository::Entity;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PgBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

/// Store that executes composed statements for entity `E`
#[async_trait]
pub trait Backend<E: Entity>: Send + Sync {
    /// Placeholder style statements are rendered with
    fn dialect(&self) -> Dialect;

    async fn fetch_all(&self, statement: &SqlStatement) -> RepositoryResult<Vec<E>>;

    async fn fetch_optional(&self, statement: &SqlStatement) -> RepositoryResult<Option<E>>;

    /// Rows as positional JSON values, for projections and scalars
    async fn fetch_rows(&self, statement: &SqlStatement) -> RepositoryResult<Vec<Vec<Value>>>;

    /// Run a mutation, returning the number of affected rows
    async fn execute(&self, statement: &SqlStatement) -> RepositoryResult<u64>;

    fn render(&self, query: &SelectQuery) -> SqlStatement {
        let statement = query.to_statement(self.dialect());
        debug!(
            sql = %statement.sql,
            params = statement.params.len(),
            "Rendered query"
        );
        statement
    }

    async fn all(&self, query: &SelectQuery) -> RepositoryResult<Vec<E>> {
        let statement = self.render(query);
        self.fetch_all(&statement).await
    }

    async fn first(&self, query: &SelectQuery) -> RepositoryResult<Option<E>> {
        let statement = self.render(query);
        self.fetch_optional(&statement).await
    }

    /// Selected columns of every row
    async fn values(&self, query: &SelectQuery) -> RepositoryResult<Vec<Vec<Value>>> {
        let statement = self.render(query);
        self.fetch_rows(&statement).await
    }

    /// First column of every row as an identity
    async fn ids(&self, query: &SelectQuery) -> RepositoryResult<Vec<i64>> {
        self.values(query)
            .await?
            .iter()
            .map(|row| first_integer(row))
            .collect()
    }

    /// Number of rows the query matches, ignoring its order and window
    async fn count(&self, query: &SelectQuery) -> RepositoryResult<u64> {
        let rows = self.values(&query.count_query()).await?;
        match rows.first() {
            Some(row) => {
                let count = first_integer(row)?;
                u64::try_from(count).map_err(|_| decode_error(format!("negative count {count}")))
            }
            None => Ok(0),
        }
    }

    async fn exists(&self, query: &SelectQuery) -> RepositoryResult<bool> {
        let rows = self.values(&query.exists_query()).await?;
        Ok(!rows.is_empty())
    }

    /// Insert a row, returning the generated identity
    async fn insert(&self, insert: &InsertStatement) -> RepositoryResult<i64> {
        let statement = insert.to_statement(self.dialect());
        debug!(sql = %statement.sql, table = %insert.table, "Inserting row");
        let rows = self.fetch_rows(&statement).await?;
        match rows.first() {
            Some(row) => first_integer(row),
            None => Err(decode_error(format!(
                "insert into {} returned no identity",
                insert.table
            ))),
        }
    }

    async fn update(&self, update: &UpdateStatement) -> RepositoryResult<u64> {
        let statement = update.to_statement(self.dialect());
        debug!(sql = %statement.sql, table = %update.table, "Updating rows");
        self.execute(&statement).await
    }

    async fn delete(&self, delete: &DeleteStatement) -> RepositoryResult<u64> {
        let statement = delete.to_statement(self.dialect());
        debug!(sql = %statement.sql, table = %delete.table, "Deleting rows");
        self.execute(&statement).await
    }
}

fn decode_error(message: String) -> RepositoryError {
    RepositoryError::Backend(sqlx::Error::Decode(message.into()))
}

/// Leading column of a row as an integer
pub(crate) fn first_integer(row: &[Value]) -> RepositoryResult<i64> {
    match row.first() {
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| decode_error(format!("expected an integer, got {number}"))),
        Some(Value::String(text)) => text
            .parse::<i64>()
            .map_err(|_| decode_error(format!("expected an integer, got {text:?}"))),
        Some(other) => Err(decode_error(format!("expected an integer, got {other}"))),
        None => Err(decode_error("row has no columns".to_string())),
    }
}
