use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use taproom_core::{Audit, Entity, EntityId, EntityStore, StoreError, StoreResult};

/// In-memory entity store for tests/dev.
///
/// Ids are allocated sequentially from 1; `find_all` returns records in id order.
#[derive(Debug)]
pub struct InMemoryEntityStore<E> {
    inner: RwLock<Inner<E>>,
}

#[derive(Debug)]
struct Inner<E> {
    rows: BTreeMap<EntityId, E>,
    /// `None` once every positive `i32` has been handed out.
    next_id: Option<EntityId>,
}

impl<E> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self::starting_at(EntityId::first())
    }

    /// Empty store whose first insert receives `first`.
    pub fn starting_at(first: EntityId) -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: Some(first),
            }),
        }
    }
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::unavailable("in-memory store lock poisoned")
}

#[async_trait::async_trait]
impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    async fn find_all(&self) -> StoreResult<Vec<E>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<E>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn save(&self, entity: E) -> StoreResult<E> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let now = Utc::now();

        let saved = match entity.id() {
            None => {
                let id = inner
                    .next_id
                    .ok_or_else(|| StoreError::unavailable("id space exhausted"))?;
                inner.next_id = id.next();
                entity.with_identity(id, Audit::inserted_at(now))
            }
            Some(id) => {
                let stored = inner.rows.get(&id).ok_or(StoreError::MissingRow(id))?;
                let audit = stored.audit().touched_at(now);
                entity.with_identity(id, audit)
            }
        };

        if let Some(id) = saved.id() {
            inner.rows.insert(id, saved.clone());
        }
        Ok(saved)
    }

    async fn delete_by_id(&self, id: EntityId) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.rows.remove(&id);
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.len() as u64)
    }
}
