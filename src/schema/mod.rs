//! Static serialization schema definitions.
//!
//! A schema is the per-entity-type configuration consumed by the serializer:
//! the declared field list (in output order), relation descriptors, the
//! default and maximum serialization depth, expansion exclusions, and nested
//! schema overrides.
//!
//! # Overview
//!
//! 1. **Core Types** (`definition.rs`):
//!    - `Field` / `FieldKind` - A declared field: scalar or relation
//!    - `RelationDef` - Soft foreign-key descriptor (key attribute, remote
//!      kind, remote key, cardinality, nullability)
//!    - `Schema` - The complete per-entity-type configuration
//!    - `SchemaError` - Fail-fast configuration errors
//!
//! 2. **Blog Schemas** (`blog.rs`):
//!    - `USER`, `POST`, `COMMENT`
//!    - `ALL_SCHEMAS` - Slice for easy registration of all three
//!
//! # Depth invariants
//!
//! `default_depth <= max_depth` always holds for a registered schema; a
//! declaration violating it is rejected with `SchemaError::Configuration` at
//! registration time. Client-requested depths are a different matter: they
//! are clamped into `0..=max_depth` silently, never rejected.

mod blog;
mod definition;

pub use blog::{ALL_SCHEMAS, COMMENT, POST, USER};
pub use definition::{Field, FieldKind, RelationDef, Schema, SchemaError};
