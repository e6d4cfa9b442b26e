//! Entity store abstraction.
//!
//! The serialization core does not own persistence; it consumes a store
//! capable of point lookups by a named key attribute, returning
//! exactly-one-or-not-found. Each relation expansion performs its own lookup;
//! there is no batching or prefetching at this layer.

mod memory;

pub use memory::MemoryStore;

use serde_json::Value;
use thiserror::Error;

use crate::entity::Entity;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Lookup in '{kind}' failed: {message}")]
    LookupFailed { kind: String, message: String },

    #[error("Lookup '{kind}.{key_attr}' matched {count} records, expected at most one")]
    Ambiguous {
        kind: String,
        key_attr: String,
        count: usize,
    },
}

/// Trait for stores that can look up entities by a key attribute.
///
/// Implementations return `Ok(None)` for a clean miss and reserve errors for
/// lookups that could not be answered (backend failure, ambiguous match).
pub trait EntityStore {
    /// Find the single entity of `kind` whose `key_attr` equals `key`.
    fn find_by_key(
        &self,
        kind: &str,
        key_attr: &str,
        key: &Value,
    ) -> Result<Option<Entity>, StoreError>;

    /// Get the store name for logging/debugging.
    fn store_name(&self) -> &'static str;
}
