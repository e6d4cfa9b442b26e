//! Dynamic entity records.
//!
//! An `Entity` is any record participating in serialization: a kind name
//! (matching a schema), an ordered attribute map, and a per-instance cache of
//! resolved relation targets.
//!
//! # Type Decisions
//!
//! **Why `serde_json::Value` for attributes instead of a custom value enum?**
//! The serializer's output is a JSON document, so storing attributes as JSON
//! values makes serialization a clone rather than a conversion. The
//! `preserve_order` feature keeps attribute (and output) ordering stable.
//!
//! **Why `RefCell`/`Rc` for the resolution cache?**
//! One serialization call processes one entity graph on one thread. The cache
//! is deliberately unsynchronized; sharing an entity instance across threads
//! during serialization is outside the contract, and `Rc` makes that a
//! compile error rather than a data race.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

/// A dynamic record with named attributes and a resolved-relation cache.
///
/// Attributes are stored in insertion order. Relation key attributes (e.g.
/// `author_id`) live in the same map as scalar attributes; the schema decides
/// which is which.
#[derive(Debug)]
pub struct Entity {
    kind: &'static str,
    attrs: Map<String, Value>,
    cache: RefCell<HashMap<String, Rc<Entity>>>,
}

impl Entity {
    /// Create an empty entity of the given kind.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            attrs: Map::new(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Builder-style attribute setter, used heavily by fixtures and tests.
    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_string(), value);
        self
    }

    /// The entity-type name, matching a schema's `kind`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Read a named attribute.
    ///
    /// Returns `None` for attributes that were never set. Callers treat an
    /// explicit `Value::Null` the same as absent.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Read a named attribute, treating stored nulls as absent.
    pub fn attr_non_null(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name).filter(|v| !v.is_null())
    }

    /// Write a named attribute.
    ///
    /// Writing a relation key attribute directly does NOT touch the
    /// resolution cache; the resolver revalidates cached targets against the
    /// current key value on every access, so a stale entry is simply
    /// re-fetched on the next resolve.
    pub fn set_attr(&mut self, name: &str, value: Value) {
        self.attrs.insert(name.to_string(), value);
    }

    /// The primary key attribute (`id`), if set.
    pub fn pk(&self) -> Option<&Value> {
        self.attr_non_null("id")
    }

    /// All attributes, in insertion order.
    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    /// The cached resolution target for a relation key attribute, if any.
    ///
    /// Validity (cached pk still equals the current key attribute) is the
    /// resolver's responsibility, not this accessor's.
    pub fn cached(&self, key_attr: &str) -> Option<Rc<Entity>> {
        self.cache.borrow().get(key_attr).cloned()
    }

    /// Store a resolved target for a relation key attribute.
    pub fn cache_put(&self, key_attr: &str, target: Rc<Entity>) {
        self.cache.borrow_mut().insert(key_attr.to_string(), target);
    }

    /// Drop the cached target for a relation key attribute.
    pub fn cache_remove(&self, key_attr: &str) {
        self.cache.borrow_mut().remove(key_attr);
    }
}

// Manual impl: a clone is a new instance, and caches live and die with the
// instance they belong to.
impl Clone for Entity {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            attrs: self.attrs.clone(),
            cache: RefCell::new(HashMap::new()),
        }
    }
}

/// Get a value's type name for error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
