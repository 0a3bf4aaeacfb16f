#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt::Write as _;

use sha2::{Digest as _, Sha256};

/// Stable identifier for a resource, derived from its display name so the
/// same name maps to the same id across sessions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(short_hash(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The known resource set. Stands in for the host application's resource
/// registry; `Allocation` parsing resolves names against it.
#[derive(Debug, Clone, Default)]
pub struct ResourceDirectory {
    names: BTreeMap<ResourceId, String>,
}

impl ResourceDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource by display name. Idempotent: adding the same
    /// name twice yields the same id.
    pub fn add(&mut self, name: &str) -> ResourceId {
        let id = ResourceId::from_name(name);
        self.names.entry(id.clone()).or_insert_with(|| name.to_owned());
        id
    }

    /// Exact, case-sensitive name lookup.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ResourceId> {
        let id = ResourceId::from_name(name);
        self.names.contains_key(&id).then_some(id)
    }

    #[must_use]
    pub fn name_of(&self, id: &ResourceId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &str)> {
        self.names.iter().map(|(id, name)| (id, name.as_str()))
    }
}

fn short_hash(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let bytes = &digest[..4];
    let mut s = String::with_capacity(8);
    for b in bytes {
        let _ = write!(&mut s, "{b:02x}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_name_derived() {
        let a = ResourceId::from_name("John Doe");
        let b = ResourceId::from_name("John Doe");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 8);
        assert_ne!(a, ResourceId::from_name("Jane Doe"));
    }

    #[test]
    fn add_resolve_round_trip() {
        let mut dir = ResourceDirectory::new();
        let id = dir.add("John Doe");
        assert_eq!(dir.add("John Doe"), id);
        assert_eq!(dir.resolve("John Doe"), Some(id.clone()));
        assert_eq!(dir.name_of(&id), Some("John Doe"));
        assert_eq!(dir.resolve("Nobody"), None);
        // Lookup is case-sensitive.
        assert_eq!(dir.resolve("john doe"), None);
        assert_eq!(dir.len(), 1);
    }
}
