//! Core schema definition types.
//!
//! Provides a store-agnostic description of an entity type: its field list,
//! relation descriptors, depth limits, and expansion exclusions. Schemas are
//! static configuration; they are declared as static items and validated once
//! at registration time.

use thiserror::Error;

/// Schema configuration errors.
///
/// All of these are programming errors in a schema declaration, raised at
/// registration time and never from a runtime request.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema '{kind}': default depth {default_depth} exceeds max depth {max_depth}")]
    Configuration {
        kind: &'static str,
        default_depth: u32,
        max_depth: u32,
    },

    #[error("Schema '{kind}': max depth {max_depth} exceeds hard cap {hard_cap}")]
    HardCapExceeded {
        kind: &'static str,
        max_depth: u32,
        hard_cap: u32,
    },

    #[error("Schema '{kind}' is already registered")]
    Duplicate { kind: &'static str },
}

/// Describes a soft foreign-key relation.
///
/// The stored key attribute (`key_attr`) is an integer (or list of integers,
/// when `many`) referencing another entity's key attribute with no
/// storage-level integrity guarantee. Resolution is an explicit lookup that
/// is permitted to fail without corrupting the source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    /// Attribute holding the raw key(s) on the owning entity
    /// (e.g. "author_id", "comment_ids")
    pub key_attr: &'static str,

    /// Kind of the referenced entity (e.g. "user")
    pub remote_kind: &'static str,

    /// Key attribute looked up on the referenced entity (usually "id")
    pub remote_key: &'static str,

    /// Whether the key attribute holds a list of keys
    pub many: bool,

    /// Whether assigning null to this relation is rejected
    pub required: bool,
}

/// The kind of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain value emitted as-is (string/number/boolean/date-string)
    Scalar,
    /// Reference to another entity, expanded or collapsed by depth
    Relation(RelationDef),
}

/// A single field in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name as it appears in output documents (e.g. "title", "author")
    pub name: &'static str,

    /// Scalar or relation
    pub kind: FieldKind,

    /// Write-only fields (e.g. passwords) are never serialized
    pub write_only: bool,
}

impl Field {
    /// The relation descriptor, if this is a relation field.
    pub fn relation(&self) -> Option<&RelationDef> {
        match &self.kind {
            FieldKind::Relation(def) => Some(def),
            FieldKind::Scalar => None,
        }
    }
}

/// Static per-entity-type serialization configuration.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Entity-type name this schema serializes (e.g. "post")
    pub kind: &'static str,

    /// Declared field list, in output order
    pub fields: &'static [Field],

    /// Depth applied when a request carries no explicit depth
    pub default_depth: u32,

    /// Maximum depth a client may request; larger requests are clamped
    pub max_depth: u32,

    /// Relation fields never expanded, regardless of depth
    pub ignore_depth_fields: &'static [&'static str],

    /// Per-field nested schema overrides: (field name, schema kind)
    pub nested_schemas: &'static [(&'static str, &'static str)],
}

impl Schema {
    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a relation field is exempt from expansion at any depth.
    pub fn is_ignored(&self, field_name: &str) -> bool {
        self.ignore_depth_fields.contains(&field_name)
    }

    /// The explicit nested schema kind registered for a field, if any.
    pub fn nested_schema_kind(&self, field_name: &str) -> Option<&'static str> {
        self.nested_schemas
            .iter()
            .find(|(name, _)| *name == field_name)
            .map(|(_, kind)| *kind)
    }

    /// Validate static configuration against the depth invariants.
    ///
    /// A schema declaring a default depth beyond its own max is a programming
    /// error and fails fast here; client-requested depths, in contrast, are
    /// silently clamped at serialization time.
    pub fn validate(&self, hard_cap: u32) -> Result<(), SchemaError> {
        if self.default_depth > self.max_depth {
            return Err(SchemaError::Configuration {
                kind: self.kind,
                default_depth: self.default_depth,
                max_depth: self.max_depth,
            });
        }

        if self.max_depth > hard_cap {
            return Err(SchemaError::HardCapExceeded {
                kind: self.kind,
                max_depth: self.max_depth,
                hard_cap,
            });
        }

        Ok(())
    }
}
