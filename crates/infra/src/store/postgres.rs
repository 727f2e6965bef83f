//! Postgres-backed entity stores.
//!
//! One concrete store per table (`beer`, `customer`). Audit stamps are
//! written from the application clock so both store implementations behave
//! identically.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database / Io / PoolClosed / PoolTimedOut / other | `Unavailable` |
//! | ColumnDecode / ColumnNotFound | `Corrupt` |
//! | `UPDATE ... RETURNING` yields no row | `MissingRow` |
//!
//! ## Thread Safety
//!
//! Uses the SQLx connection pool, which is `Send + Sync`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use taproom_catalog::{Beer, Customer, Price};
use taproom_core::{Audit, Entity, EntityId, EntityStore, StoreError, StoreResult};

/// Postgres store for `Beer` (table `beer`).
#[derive(Debug, Clone)]
pub struct PostgresBeerStore {
    pool: Arc<PgPool>,
}

impl PostgresBeerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

/// Postgres store for `Customer` (table `customer`).
#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    pool: Arc<PgPool>,
}

impl PostgresCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

const BEER_COLUMNS: &str =
    "id, beer_name, beer_style, upc, quantity_on_hand, price_minor, created_date, last_modified_date";

const CUSTOMER_COLUMNS: &str = "id, customer_name, created_date, last_modified_date";

#[async_trait::async_trait]
impl EntityStore<Beer> for PostgresBeerStore {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        let rows = sqlx::query(&format!("SELECT {BEER_COLUMNS} FROM beer ORDER BY id"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_beer", e))?;

        rows.iter().map(beer_from_row).collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Beer>> {
        let row = sqlx::query(&format!("SELECT {BEER_COLUMNS} FROM beer WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_beer", e))?;

        row.as_ref().map(beer_from_row).transpose()
    }

    #[instrument(skip(self, entity), fields(id = ?entity.id()), err)]
    async fn save(&self, entity: Beer) -> StoreResult<Beer> {
        let now = Utc::now();
        let price = entity.price().map(|p| p.minor_units());

        match entity.id() {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO beer (
                        beer_name, beer_style, upc, quantity_on_hand, price_minor,
                        created_date, last_modified_date
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $6)
                    RETURNING id
                    "#,
                )
                .bind(entity.beer_name())
                .bind(entity.beer_style())
                .bind(entity.upc())
                .bind(entity.quantity_on_hand())
                .bind(price)
                .bind(now)
                .fetch_one(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("insert_beer", e))?;

                let id = id_from_row(&row)?;
                Ok(entity.with_identity(id, Audit::inserted_at(now)))
            }
            Some(id) => {
                let row = sqlx::query(
                    r#"
                    UPDATE beer SET
                        beer_name = $2,
                        beer_style = $3,
                        upc = $4,
                        quantity_on_hand = $5,
                        price_minor = $6,
                        last_modified_date = $7
                    WHERE id = $1
                    RETURNING created_date
                    "#,
                )
                .bind(id.get())
                .bind(entity.beer_name())
                .bind(entity.beer_style())
                .bind(entity.upc())
                .bind(entity.quantity_on_hand())
                .bind(price)
                .bind(now)
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("update_beer", e))?
                .ok_or(StoreError::MissingRow(id))?;

                let created: DateTime<Utc> = get(&row, "created_date")?;
                let audit = Audit::inserted_at(created).touched_at(now);
                Ok(entity.with_identity(id, audit))
            }
        }
    }

    async fn delete_by_id(&self, id: EntityId) -> StoreResult<()> {
        delete_from(&self.pool, "beer", id).await
    }

    async fn count(&self) -> StoreResult<u64> {
        count_rows(&self.pool, "beer").await
    }
}

#[async_trait::async_trait]
impl EntityStore<Customer> for PostgresCustomerStore {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY id"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_customer", e))?;

        rows.iter().map(customer_from_row).collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_customer", e))?;

        row.as_ref().map(customer_from_row).transpose()
    }

    #[instrument(skip(self, entity), fields(id = ?entity.id()), err)]
    async fn save(&self, entity: Customer) -> StoreResult<Customer> {
        let now = Utc::now();

        match entity.id() {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO customer (customer_name, created_date, last_modified_date)
                    VALUES ($1, $2, $2)
                    RETURNING id
                    "#,
                )
                .bind(entity.customer_name())
                .bind(now)
                .fetch_one(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("insert_customer", e))?;

                let id = id_from_row(&row)?;
                Ok(entity.with_identity(id, Audit::inserted_at(now)))
            }
            Some(id) => {
                let row = sqlx::query(
                    r#"
                    UPDATE customer SET customer_name = $2, last_modified_date = $3
                    WHERE id = $1
                    RETURNING created_date
                    "#,
                )
                .bind(id.get())
                .bind(entity.customer_name())
                .bind(now)
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("update_customer", e))?
                .ok_or(StoreError::MissingRow(id))?;

                let created: DateTime<Utc> = get(&row, "created_date")?;
                let audit = Audit::inserted_at(created).touched_at(now);
                Ok(entity.with_identity(id, audit))
            }
        }
    }

    async fn delete_by_id(&self, id: EntityId) -> StoreResult<()> {
        delete_from(&self.pool, "customer", id).await
    }

    async fn count(&self) -> StoreResult<u64> {
        count_rows(&self.pool, "customer").await
    }
}

#[instrument(skip(pool), fields(id = %id), err)]
async fn delete_from(pool: &PgPool, table: &'static str, id: EntityId) -> StoreResult<()> {
    sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id.get())
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("delete", e))?;
    Ok(())
}

async fn count_rows(pool: &PgPool, table: &'static str) -> StoreResult<u64> {
    let row = sqlx::query(&format!("SELECT COUNT(*) AS total FROM {table}"))
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error("count", e))?;

    let total: i64 = get(&row, "total")?;
    Ok(total.max(0) as u64)
}

fn beer_from_row(row: &PgRow) -> StoreResult<Beer> {
    let price = get::<Option<i64>>(row, "price_minor")?
        .map(Price::from_minor_units)
        .transpose()
        .map_err(|e| StoreError::corrupt(format!("beer.price_minor: {e}")))?;

    let beer = Beer::new(
        get(row, "beer_name")?,
        get(row, "beer_style")?,
        get(row, "upc")?,
        get(row, "quantity_on_hand")?,
        price,
    );
    Ok(beer.with_identity(id_from_row(row)?, audit_from_row(row)?))
}

fn customer_from_row(row: &PgRow) -> StoreResult<Customer> {
    let customer = Customer::new(get(row, "customer_name")?);
    Ok(customer.with_identity(id_from_row(row)?, audit_from_row(row)?))
}

fn id_from_row(row: &PgRow) -> StoreResult<EntityId> {
    let raw: i32 = get(row, "id")?;
    EntityId::new(raw).map_err(|e| StoreError::corrupt(e.to_string()))
}

fn audit_from_row(row: &PgRow) -> StoreResult<Audit> {
    Ok(Audit {
        created_date: get(row, "created_date")?,
        last_modified_date: get(row, "last_modified_date")?,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::corrupt(format!("column {column}: {e}")))
}

/// Map SQLx errors into `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            StoreError::corrupt(format!("{operation}: {err}"))
        }
        sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::unavailable(format!("timed out waiting for a connection in {operation}"))
        }
        sqlx::Error::Database(db_err) => {
            StoreError::unavailable(format!("database error in {operation}: {}", db_err.message()))
        }
        other => StoreError::unavailable(format!("sqlx error in {operation}: {other}")),
    }
}
