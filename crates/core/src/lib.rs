//! `taproom-core`: shared building blocks for the catalog resources.
//!
//! This crate contains **pure domain** primitives plus the persistence seam
//! (`EntityStore`). Concrete stores live in `taproom-infra`.

pub mod entity;
pub mod error;
pub mod id;
pub mod store;

pub use entity::{Audit, Entity};
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
pub use store::{EntityStore, StoreError, StoreResult};
