//! Store-assigned identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a persisted record.
///
/// Assigned by the store on first persist and never changed afterwards.
/// Valid identifiers are strictly positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i32);

impl EntityId {
    /// Wrap a raw identifier, rejecting zero and negative values.
    pub fn new(raw: i32) -> Result<Self, DomainError> {
        if raw <= 0 {
            return Err(DomainError::invalid_id(format!("EntityId: {raw} is not positive")));
        }
        Ok(Self(raw))
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Identifier following this one, or `None` once the `i32` range is used up.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    pub fn first() -> Self {
        Self(1)
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i32> for EntityId {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for i32 {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i32>()
            .map_err(|e| DomainError::invalid_id(format!("EntityId: {e}")))?;
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        let id: EntityId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        assert!(matches!("0".parse::<EntityId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("-3".parse::<EntityId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("abc".parse::<EntityId>(), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn next_is_sequential() {
        assert_eq!(EntityId::first().next().map(|id| id.get()), Some(2));
        assert_eq!(EntityId::new(i32::MAX).unwrap().next(), None);
    }

    #[test]
    fn serializes_as_bare_integer() {
        let id = EntityId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
