use super::Backend;
use crate::config::DatabaseConfig;
use crate::error::RepositoryResult;
use crate::query_builder::{Dialect, SqlStatement};
use crate::repository::Entity;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{Arguments, FromRow, Row, TypeInfo, ValueRef};
use tracing::{info, instrument};
use uuid::Uuid;

/// PostgreSQL backend over a `sqlx` pool
///
/// Parameters are bound by JSON type: integers as `INT8`, other numbers as
/// `FLOAT8`, strings as `TEXT`, arrays and objects as `JSONB`. Columns of
/// other types need an explicit cast in the filter (`created_at::text`).
#[derive(Debug, Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;
        info!("Connected to PostgreSQL database");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> RepositoryResult<bool> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;
        let health: i32 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn arguments(params: &[Value]) -> Result<PgArguments, sqlx::Error> {
    let mut args = PgArguments::default();
    for value in params {
        let added = match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(flag) => args.add(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => args.add(integer),
                None => args.add(number.as_f64()),
            },
            Value::String(text) => args.add(text.clone()),
            other => args.add(Json(other.clone())),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

fn decode_column(row: &PgRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "BOOL" => Value::from(row.try_get::<bool, _>(index)?),
        "INT2" => Value::from(row.try_get::<i16, _>(index)?),
        "INT4" => Value::from(row.try_get::<i32, _>(index)?),
        "INT8" => Value::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => Value::from(row.try_get::<f32, _>(index)?),
        "FLOAT8" => Value::from(row.try_get::<f64, _>(index)?),
        "JSON" | "JSONB" => row.try_get::<Json<Value>, _>(index)?.0,
        "UUID" => Value::from(row.try_get::<Uuid, _>(index)?.to_string()),
        "TIMESTAMPTZ" => Value::from(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
        "TIMESTAMP" => Value::from(row.try_get::<NaiveDateTime, _>(index)?.to_string()),
        "DATE" => Value::from(row.try_get::<NaiveDate, _>(index)?.to_string()),
        _ => Value::from(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}

fn decode_row(row: &PgRow) -> Result<Vec<Value>, sqlx::Error> {
    (0..row.len()).map(|index| decode_column(row, index)).collect()
}

#[async_trait]
impl<E> Backend<E> for PgBackend
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
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
