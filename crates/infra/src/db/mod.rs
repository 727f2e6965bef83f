//! Database adapters: connection pool and schema bootstrap.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use taproom_core::StoreError;

/// DDL applied at startup. Idempotent (`CREATE TABLE IF NOT EXISTS`).
pub const SCHEMA: &str = include_str!("schema.sql");

/// Connect a Postgres pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| StoreError::unavailable(format!("failed to connect to Postgres: {e}")))
}

/// Create the `beer` and `customer` tables if they do not exist.
///
/// Must complete before the first store call.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| StoreError::unavailable(format!("schema bootstrap failed: {e}")))?;

    tracing::info!("database schema ready");
    Ok(())
}
