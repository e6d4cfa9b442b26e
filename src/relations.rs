//! Soft foreign-key resolution.
//!
//! A soft relation stores an integer key attribute referencing another
//! entity's key, with no storage-level integrity guarantee. This module is
//! the explicit accessor pair for such relations: `resolve` reads through the
//! per-instance cache to the store, `assign` writes the key attribute and the
//! cache together. Making the lookup/cache/validation contract a pair of
//! functions (rather than transparent attribute interception) keeps it
//! visible at every call site.
//!
//! Lookup failures are surfaced, not swallowed: a dangling key yields
//! `ReferenceNotFound` and a non-integer key yields `TypeMismatch`. The one
//! permissive behavior preserved from the product rules is that an absent or
//! null key means "no relation", which is a successful `None`, not an error.

use std::rc::Rc;

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::entity::{value_type_name, Entity};
use crate::schema::RelationDef;
use crate::store::{EntityStore, StoreError};

/// Relation resolution and assignment errors.
#[derive(Error, Debug)]
pub enum RelationError {
    /// The stored key refers to nothing in the remote store. The caller
    /// decides whether this is fatal or logged; the resolver never hides it.
    #[error("{remote_kind} with {remote_key}={key} does not exist")]
    ReferenceNotFound {
        remote_kind: &'static str,
        remote_key: &'static str,
        key: Value,
    },

    /// The key attribute or assigned value has the wrong type.
    #[error("Relation '{key_attr}' expected {expected}, found {found}")]
    TypeMismatch {
        key_attr: &'static str,
        expected: String,
        found: String,
    },

    /// Null assigned to a relation that does not allow it.
    #[error("Cannot assign null: relation '{key_attr}' does not allow null values")]
    NullRelation { key_attr: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve a single-valued soft relation to its target entity.
///
/// Reads the key attribute from `entity`; an absent or null key is "no
/// relation" and returns `Ok(None)` without touching the store. A cached
/// target whose remote key still equals the current key attribute is returned
/// as-is, so repeated resolutions within one serialization pass cost one
/// lookup. The cache is keyed on the current key value, not on dirty flags:
/// writing the key attribute directly simply makes the next resolve re-fetch.
///
/// # Errors
///
/// `TypeMismatch` if the stored key is not an integer, `ReferenceNotFound`
/// if the remote store has no matching entity.
pub fn resolve(
    entity: &Entity,
    def: &RelationDef,
    store: &dyn EntityStore,
) -> Result<Option<Rc<Entity>>, RelationError> {
    let Some(key) = entity.attr_non_null(def.key_attr).cloned() else {
        return Ok(None);
    };

    if !key.is_i64() && !key.is_u64() {
        return Err(RelationError::TypeMismatch {
            key_attr: def.key_attr,
            expected: "an integer key".to_string(),
            found: value_type_name(&key).to_string(),
        });
    }

    if let Some(cached) = entity.cached(def.key_attr) {
        if cached.attr(def.remote_key) == Some(&key) {
            debug!(
                "Cache hit for '{}' on {} (key={})",
                def.key_attr,
                entity.kind(),
                key
            );
            return Ok(Some(cached));
        }
        debug!(
            "Cache stale for '{}' on {} (key={}), re-fetching",
            def.key_attr,
            entity.kind(),
            key
        );
    }

    let target = store
        .find_by_key(def.remote_kind, def.remote_key, &key)?
        .ok_or(RelationError::ReferenceNotFound {
            remote_kind: def.remote_kind,
            remote_key: def.remote_key,
            key: key.clone(),
        })?;

    let target = Rc::new(target);
    entity.cache_put(def.key_attr, Rc::clone(&target));
    Ok(Some(target))
}

/// Assign a new target (or null) to a soft relation.
///
/// On a valid assignment the key attribute and the cache are updated together
/// before returning, so no state where they disagree is ever observable.
/// Assignment never writes to the remote store.
///
/// # Errors
///
/// `NullRelation` when assigning `None` to a required relation;
/// `TypeMismatch` when the value's kind differs from the relation's remote
/// kind or the value carries no remote key.
pub fn assign(
    entity: &mut Entity,
    def: &RelationDef,
    value: Option<Entity>,
) -> Result<(), RelationError> {
    let Some(target) = value else {
        if def.required {
            return Err(RelationError::NullRelation {
                key_attr: def.key_attr,
            });
        }
        entity.set_attr(def.key_attr, Value::Null);
        entity.cache_remove(def.key_attr);
        return Ok(());
    };

    if target.kind() != def.remote_kind {
        return Err(RelationError::TypeMismatch {
            key_attr: def.key_attr,
            expected: format!("a '{}' entity", def.remote_kind),
            found: format!("a '{}' entity", target.kind()),
        });
    }

    let Some(key) = target.attr_non_null(def.remote_key).cloned() else {
        return Err(RelationError::TypeMismatch {
            key_attr: def.key_attr,
            expected: format!("an entity with '{}' set", def.remote_key),
            found: format!("a '{}' entity without it", target.kind()),
        });
    };

    entity.set_attr(def.key_attr, key);
    entity.cache_put(def.key_attr, Rc::new(target));
    Ok(())
}
