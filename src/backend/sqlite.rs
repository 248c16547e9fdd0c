use super::Backend;
use crate::config::DatabaseConfig;
use crate::error::RepositoryResult;
use crate::query_builder::{Dialect, SqlStatement};
use crate::repository::Entity;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Arguments, FromRow, Row, TypeInfo, ValueRef};
use tracing::{info, instrument};

/// SQLite backend over a `sqlx` pool
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;
        info!("Connected to SQLite database");
        Ok(Self::new(pool))
    }

    /// Private in-memory database
    ///
    /// Every connection to `sqlite::memory:` opens its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> RepositoryResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> RepositoryResult<bool> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;
        let health: i64 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn arguments<'q>(params: &[Value]) -> Result<SqliteArguments<'q>, sqlx::Error> {
    let mut args = SqliteArguments::default();
    for value in params {
        let added = match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(flag) => args.add(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => args.add(integer),
                None => args.add(number.as_f64()),
            },
            Value::String(text) => args.add(text.clone()),
            // Nested values are stored as JSON text
            other => args.add(other.to_string()),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => Value::from(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Value::from(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Value::from(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

fn decode_row(row: &SqliteRow) -> Result<Vec<Value>, sqlx::Error> {
    (0..row.len()).map(|index| decode_column(row, index)).collect()
}

#[async_trait]
impl<E> Backend<E> for SqliteBackend
where
    E: Entity + for<'r> FromRow<'r, SqliteRow>,
{
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn fetch_all(&self, statement: &SqlStatement) -> RepositoryResult<Vec<E>> {
        let rows = sqlx::query_as_with::<_, E, _>(&statement.sql, arguments(&statement.params)?)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_optional(&self, statement: &SqlStatement) -> RepositoryResult<Option<E>> {
        let row = sqlx::query_as_with::<_, E, _>(&statement.sql, arguments(&statement.params)?)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn fetch_rows(&self, statement: &SqlStatement) -> RepositoryResult<Vec<Vec<Value>>> {
        let rows = sqlx::query_with(&statement.sql, arguments(&statement.params)?)
            .fetch_all(&self.pool)
            .await?;
        let decoded = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decoded)
    }

    async fn execute(&self, statement: &SqlStatement) -> RepositoryResult<u64> {
        let result = sqlx::query_with(&statement.sql, arguments(&statement.params)?)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
