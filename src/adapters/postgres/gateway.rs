//! PostgreSQL implementation of the database gateway.
//!
//! Opens one dedicated `PgConnection` per call; sessions own their
//! connection outright, so no pool is involved. Result columns are decoded
//! by the column's declared Postgres type into engine field values.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Column, Connection, PgConnection, Row, TypeInfo};
use uuid::Uuid;

use crate::domain::foundation::FieldValue;
use crate::ports::{DatabaseGateway, GatewayError, SessionConnection, SqlRow};

/// Gateway opening dedicated Postgres connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresGateway;

impl PostgresGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseGateway for PostgresGateway {
    async fn connect(&self, target: &str) -> Result<Box<dyn SessionConnection>, GatewayError> {
        let connection = PgConnection::connect(target)
            .await
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(Box::new(PostgresSessionConnection {
            connection: Some(connection),
        }))
    }
}

struct PostgresSessionConnection {
    connection: Option<PgConnection>,
}

#[async_trait]
impl SessionConnection for PostgresSessionConnection {
    async fn fetch_row(&mut self, sql: &str) -> Result<Option<SqlRow>, GatewayError> {
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| GatewayError::Connection("connection already closed".to_string()))?;

        let row = sqlx::query(sql)
            .fetch_optional(connection)
            .await
            .map_err(|e| GatewayError::Execution(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(decode_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<(), GatewayError> {
        if let Some(connection) = self.connection.take() {
            connection
                .close()
                .await
                .map_err(|e| GatewayError::Connection(e.to_string()))?;
        }
        Ok(())
    }
}

fn decode_row(row: &PgRow) -> Result<SqlRow, GatewayError> {
    let mut values = Vec::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        values.push(decode_column(row, index, column.type_info().name())?);
    }
    Ok(values)
}

fn decode_column(
    row: &PgRow,
    index: usize,
    type_name: &str,
) -> Result<Option<FieldValue>, GatewayError> {
    let decode_err = |e: sqlx::Error| GatewayError::Decode(format!("column {}: {}", index, e));

    let value = match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .map_err(decode_err)?
            .map(FieldValue::Boolean),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map_err(decode_err)?
            .map(|v| FieldValue::Integer(v as i64)),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map_err(decode_err)?
            .map(|v| FieldValue::Integer(v as i64)),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map_err(decode_err)?
            .map(FieldValue::Integer),
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(index)
            .map_err(decode_err)?
            .map(FieldValue::Decimal),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map_err(decode_err)?
            .and_then(|v| Decimal::from_f32(v))
            .map(FieldValue::Decimal),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .map_err(decode_err)?
            .and_then(|v| Decimal::from_f64(v))
            .map(FieldValue::Decimal),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map_err(decode_err)?
            .map(FieldValue::Timestamp),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map_err(decode_err)?
            .map(|naive| FieldValue::Timestamp(naive.and_utc())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .map_err(decode_err)?
            .map(|d| FieldValue::Text(d.to_string())),
        "UUID" => row
            .try_get::<Option<Uuid>, _>(index)
            .map_err(decode_err)?
            .map(|u| FieldValue::Text(u.to_string())),
        _ => row
            .try_get::<Option<String>, _>(index)
            .map_err(decode_err)?
            .map(FieldValue::Text),
    };

    Ok(value)
}
