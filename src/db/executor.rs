//! Pooled MySQL executor with dynamic row decoding.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::mysql::{MySqlColumn, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row, TypeInfo};
use tracing::warn;

use crate::db::value::{ResultSet, Value};
use crate::error::{AskdbError, Result};

/// Anything that can run SQL text and produce a [`ResultSet`].
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run(&self, sql: &str) -> Result<ResultSet>;
}

/// Executor backed by a sqlx MySQL connection pool.
///
/// Connections are acquired per query and returned to the pool on every exit
/// path, including execution failures.
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Connects a pool to the given URL and verifies it with `SELECT 1`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(|e| AskdbError::Execution(format!("Failed to connect to MySQL: {}", e)))?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| AskdbError::Execution(format!("Connection check failed: {}", e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn run(&self, sql: &str) -> Result<ResultSet> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AskdbError::Execution(e.to_string()))?;

        let columns: Vec<String> = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => Vec::new(),
        };

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            decoded.push(decode_row(row)?);
        }

        Ok(ResultSet::new(columns, decoded))
    }
}

fn decode_row(row: &MySqlRow) -> Result<Vec<Value>> {
    let mut cells = Vec::with_capacity(row.columns().len());
    for (idx, column) in row.columns().iter().enumerate() {
        cells.push(decode_cell(row, idx, column)?);
    }
    Ok(cells)
}

/// Decodes one cell by the column's reported MySQL type name.
///
/// Dates and decimals are rendered as text so the result stays a flat value
/// grid. Types with no typed arm go through [`fallback_decode`].
fn decode_cell(row: &MySqlRow, idx: usize, column: &MySqlColumn) -> Result<Value> {
    let type_name = column.type_info().name();
    match type_name {
        "NULL" => Ok(Value::Null),
        "BOOLEAN" => opt(row.try_get::<Option<bool>, _>(idx), column, Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            opt(row.try_get::<Option<i64>, _>(idx), column, Value::Int)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" | "BIT" => {
            opt(row.try_get::<Option<u64>, _>(idx), column, Value::UInt)
        }
        "FLOAT" => opt(row.try_get::<Option<f32>, _>(idx), column, |v| {
            Value::Float(f64::from(v))
        }),
        "DOUBLE" => opt(row.try_get::<Option<f64>, _>(idx), column, Value::Float),
        "DECIMAL" => opt(
            row.try_get::<Option<sqlx::types::Decimal>, _>(idx),
            column,
            |v| Value::Text(v.to_string()),
        ),
        "DATE" => opt(row.try_get::<Option<NaiveDate>, _>(idx), column, |v| {
            Value::Text(v.to_string())
        }),
        "TIME" => opt(row.try_get::<Option<NaiveTime>, _>(idx), column, |v| {
            Value::Text(v.to_string())
        }),
        "DATETIME" => opt(row.try_get::<Option<NaiveDateTime>, _>(idx), column, |v| {
            Value::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())
        }),
        "TIMESTAMP" => opt(
            row.try_get::<Option<DateTime<Utc>>, _>(idx),
            column,
            |v| Value::Text(v.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            opt(row.try_get::<Option<String>, _>(idx), column, Value::Text)
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            opt(row.try_get::<Option<Vec<u8>>, _>(idx), column, Value::Bytes)
        }
        _ => Ok(fallback_decode(row, idx, column, type_name)),
    }
}

fn opt<T>(
    decoded: std::result::Result<Option<T>, sqlx::Error>,
    column: &MySqlColumn,
    wrap: impl FnOnce(T) -> Value,
) -> Result<Value> {
    match decoded {
        Ok(Some(v)) => Ok(wrap(v)),
        Ok(None) => Ok(Value::Null),
        Err(e) => Err(AskdbError::Execution(format!(
            "Failed to decode column '{}': {}",
            column.name(),
            e
        ))),
    }
}

/// Last-resort decode for types without a dedicated arm (JSON, GEOMETRY, ...).
fn fallback_decode(row: &MySqlRow, idx: usize, column: &MySqlColumn, type_name: &str) -> Value {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::Text).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(Value::UInt).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v.map(Value::Bytes).unwrap_or(Value::Null);
    }

    warn!(
        "Unsupported MySQL type {} for column '{}', returning NULL",
        type_name,
        column.name()
    );
    Value::Null
}
