//! Entity trait: identity + audit continuity across rebuilds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Audit timestamps owned by the store.
///
/// `created_date` is written once on insert; `last_modified_date` on every save.
/// Both are `None` until the record has been persisted.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Audit {
    /// Stamps for a first insert.
    pub fn inserted_at(now: DateTime<Utc>) -> Self {
        Self {
            created_date: Some(now),
            last_modified_date: Some(now),
        }
    }

    /// Stamps for an update: creation time is kept, modification time moves.
    pub fn touched_at(self, now: DateTime<Utc>) -> Self {
        Self {
            created_date: self.created_date.or(Some(now)),
            last_modified_date: Some(now),
        }
    }
}

/// Immutable persisted record.
///
/// Entities are never mutated in place; stores hand back a new value via
/// [`Entity::with_identity`] once identity and audit stamps are known.
pub trait Entity: Clone + Send + Sync + core::fmt::Debug + 'static {
    /// Short resource name used in logs and URLs (e.g. `"beer"`).
    const KIND: &'static str;

    /// Identifier, `None` before the first persist.
    fn id(&self) -> Option<EntityId>;

    fn audit(&self) -> Audit;

    /// Same domain fields, new identity/audit.
    fn with_identity(self, id: EntityId, audit: Audit) -> Self;
}
