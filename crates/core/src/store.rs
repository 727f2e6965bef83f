//! Persistence seam for entities.
//!
//! The `EntityStore` trait is the only shared mutable resource in the system.
//! Implementations:
//! - `InMemoryEntityStore` (tests/dev)
//! - Postgres stores (production)
//!
//! ## Write ordering
//!
//! There is no optimistic locking: two concurrent saves of the same id are
//! resolved by whichever reaches the store last.

use std::sync::Arc;

use thiserror::Error;

use crate::entity::Entity;
use crate::id::EntityId;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transient infrastructure failure (connection refused, pool closed, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An update targeted a row that no longer exists.
    #[error("no row with id {0}")]
    MissingRow(EntityId),

    /// A persisted row could not be decoded into an entity.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Async key-by-id persistence for one entity kind.
#[async_trait::async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// All records, in store-defined order.
    async fn find_all(&self) -> StoreResult<Vec<E>>;

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<E>>;

    /// Insert when `entity.id()` is `None`, update otherwise.
    ///
    /// Returns the persisted value carrying its id and audit stamps.
    async fn save(&self, entity: E) -> StoreResult<E>;

    /// Idempotent: deleting an unknown id succeeds.
    async fn delete_by_id(&self, id: EntityId) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<u64>;
}

#[async_trait::async_trait]
impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    async fn find_all(&self) -> StoreResult<Vec<E>> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<E>> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, entity: E) -> StoreResult<E> {
        (**self).save(entity).await
    }

    async fn delete_by_id(&self, id: EntityId) -> StoreResult<()> {
        (**self).delete_by_id(id).await
    }

    async fn count(&self) -> StoreResult<u64> {
        (**self).count().await
    }
}
