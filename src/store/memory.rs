//! In-memory entity store.
//!
//! The reference `EntityStore` implementation: a per-kind record list with
//! linear point lookups. Used as the test backend and as the store for
//! embedded use; a database-backed store would implement the same trait.

use std::cell::Cell;
use std::collections::BTreeMap;

use serde_json::Value;

use super::{EntityStore, StoreError};
use crate::entity::Entity;

/// BTreeMap-backed store keyed by entity kind.
///
/// Tracks how many lookups were performed, so tests can assert that cached
/// or null-keyed resolutions hit the store zero times.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<&'static str, Vec<Entity>>,
    lookups: Cell<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the store.
    pub fn insert(&mut self, entity: Entity) {
        self.records.entry(entity.kind()).or_default().push(entity);
    }

    /// Total number of stored entities across all kinds.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Whether the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `find_by_key` calls answered so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }

    /// Remove all entities of a kind, returning how many were removed.
    pub fn clear_kind(&mut self, kind: &str) -> usize {
        self.records.remove(kind).map_or(0, |v| v.len())
    }
}

impl EntityStore for MemoryStore {
    fn find_by_key(
        &self,
        kind: &str,
        key_attr: &str,
        key: &Value,
    ) -> Result<Option<Entity>, StoreError> {
        self.lookups.set(self.lookups.get() + 1);

        let matches: Vec<&Entity> = self
            .records
            .get(kind)
            .map(|entities| {
                entities
                    .iter()
                    .filter(|e| e.attr(key_attr) == Some(key))
                    .collect()
            })
            .unwrap_or_default();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches[0].clone())),
            count => Err(StoreError::Ambiguous {
                kind: kind.to_string(),
                key_attr: key_attr.to_string(),
                count,
            }),
        }
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
