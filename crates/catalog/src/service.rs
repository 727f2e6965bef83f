//! Resource service: fetch → reconcile → persist → map to DTO.
//!
//! One generic implementation serves both beers and customers.
//!
//! ## Not-found contract
//!
//! `get_by_id`, `replace` and `patch` return `Ok(None)` for an unknown id.
//! The HTTP boundary turns that into a 404; the service never raises for it.
//! `delete_by_id` is silent on unknown ids (store-level idempotence), so the
//! boundary checks existence first when it wants to report a 404.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use taproom_core::{DomainError, DomainResult, EntityId, EntityStore, StoreError};

use crate::reconcile::{Operation, Resource};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Lazy, finite sequence of transfer representations in store order.
pub type DtoStream<R> = tokio_stream::Iter<std::vec::IntoIter<<R as Resource>::Dto>>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input was rejected; nothing was written.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Store failure; not retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ResourceService<R: Resource> {
    store: Arc<dyn EntityStore<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn EntityStore<R>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore<R>> {
        &self.store
    }

    #[instrument(skip(self), fields(kind = R::KIND), err)]
    pub async fn list(&self) -> ServiceResult<DtoStream<R>> {
        let items = self.store.find_all().await?;
        let dtos: Vec<R::Dto> = items.iter().map(R::to_dto).collect();
        Ok(tokio_stream::iter(dtos))
    }

    #[instrument(skip(self), fields(kind = R::KIND, id = %id), err)]
    pub async fn get_by_id(&self, id: EntityId) -> ServiceResult<Option<R::Dto>> {
        let found = self.store.find_by_id(id).await?;
        Ok(found.as_ref().map(R::to_dto))
    }

    #[instrument(skip(self, input), fields(kind = R::KIND), err)]
    pub async fn create(&self, input: R::Dto) -> ServiceResult<R::Dto> {
        R::validate(&input, Operation::Create)?;
        let entity = R::reconcile_create(&input)?;

        let saved = self.store.save(entity).await?;
        tracing::info!(id = ?saved.id(), "created {}", R::KIND);
        Ok(saved.to_dto())
    }

    #[instrument(skip(self, input), fields(kind = R::KIND, id = %id), err)]
    pub async fn replace(&self, id: EntityId, input: R::Dto) -> ServiceResult<Option<R::Dto>> {
        self.update(id, input, Operation::Replace, R::reconcile_replace).await
    }

    #[instrument(skip(self, input), fields(kind = R::KIND, id = %id), err)]
    pub async fn patch(&self, id: EntityId, input: R::Dto) -> ServiceResult<Option<R::Dto>> {
        self.update(id, input, Operation::Patch, R::reconcile_patch).await
    }

    #[instrument(skip(self), fields(kind = R::KIND, id = %id), err)]
    pub async fn delete_by_id(&self, id: EntityId) -> ServiceResult<()> {
        self.store.delete_by_id(id).await?;
        tracing::debug!("deleted {}", R::KIND);
        Ok(())
    }

    async fn update(
        &self,
        id: EntityId,
        input: R::Dto,
        op: Operation,
        reconcile: fn(&R, &R::Dto) -> DomainResult<R>,
    ) -> ServiceResult<Option<R::Dto>> {
        R::validate(&input, op)?;

        let Some(existing) = self.store.find_by_id(id).await? else {
            tracing::debug!("{} not found", R::KIND);
            return Ok(None);
        };

        let next = reconcile(&existing, &input)?;

        match self.store.save(next).await {
            Ok(saved) => Ok(Some(saved.to_dto())),
            // Deleted between the lookup and the write.
            Err(StoreError::MissingRow(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
