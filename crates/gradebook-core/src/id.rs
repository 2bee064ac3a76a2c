//! Opaque entity identifiers.
//!
//! Every entity in a profile (course, component, assignment) is keyed by an
//! `Id`. External layers exchange ids as plain strings; the engine never
//! assumes a particular encoding beyond string equality.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, stable identifier minted once per entity.
///
/// Equality, hashing, and ordering are by the underlying string. Ids are
/// never reused after an entity is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Mint a fresh identifier, collision-free within and across processes.
    pub fn fresh() -> Self {
        Id(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let a = Id::fresh();
        let b = Id::fresh();
        let c = Id::fresh();
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn equality_is_by_string_value() {
        let external = Id::from("42");
        assert_eq!(external, Id::from("42".to_string()));
        assert_eq!(external.as_str(), "42");
    }

    #[test]
    fn serde_is_transparent() {
        let id = Id::from("abc-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-123\"");
        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
