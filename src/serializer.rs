//! Depth-bounded entity serialization.
//!
//! Converts one entity (the root) into a nested output document, expanding
//! relation fields up to the effective depth and collapsing the rest to raw
//! identifiers. The output is sparse: null or absent values are omitted
//! entirely rather than emitted as null-valued keys.
//!
//! # Depth model
//!
//! The effective depth for a call is the client-requested depth clamped into
//! `0..=schema.max_depth` (a request below zero clamps to zero, above the max
//! clamps to the max — never an error), or the schema's `default_depth` when
//! nothing was requested. Depth propagates downward through expanded
//! relations, decrementing by one per level and re-clamped against each
//! nested schema's own max. The schema itself is immutable; depth travels as
//! a call parameter, so there is no shared state to restore on exit paths.

use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entity::{value_type_name, Entity};
use crate::options::SerializeOptions;
use crate::registry::SchemaRegistry;
use crate::relations::{self, RelationError};
use crate::schema::{Field, FieldKind, RelationDef, Schema};
use crate::store::{EntityStore, StoreError};

/// Serialization error types
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Depth-bounded serializer over a schema registry and an entity store.
///
/// Holds references only; construct one per composition root (or per
/// request) and reuse it freely. Serializing different entity instances
/// concurrently is safe; sharing a single entity instance across concurrent
/// calls is not, because the per-entity resolver cache is unsynchronized.
pub struct Serializer<'a> {
    registry: &'a SchemaRegistry,
    store: &'a dyn EntityStore,
}

impl<'a> Serializer<'a> {
    pub fn new(registry: &'a SchemaRegistry, store: &'a dyn EntityStore) -> Self {
        Self { registry, store }
    }

    /// Serialize one entity into an output document.
    ///
    /// The primary entry point: applies the requested depth (clamped) or the
    /// schema default, honors the requested field subset on the root
    /// document, and recursively expands relations.
    ///
    /// # Errors
    ///
    /// Dangling soft references surface as `RelationError::ReferenceNotFound`
    /// and malformed keys as `RelationError::TypeMismatch`; store failures
    /// pass through. Malformed *requests* never error — unknown requested
    /// fields are ignored and out-of-range depths clamped.
    pub fn serialize(
        &self,
        entity: &Entity,
        schema: &Schema,
        options: &SerializeOptions,
    ) -> Result<Map<String, Value>, SerializeError> {
        let depth = effective_depth(schema, options.depth);
        self.serialize_at(entity, schema, depth, options.fields.as_deref())
    }

    fn serialize_at(
        &self,
        entity: &Entity,
        schema: &Schema,
        depth: u32,
        requested_fields: Option<&[String]>,
    ) -> Result<Map<String, Value>, SerializeError> {
        let mut doc = Map::new();

        for field in active_fields(schema, requested_fields) {
            // Write-only fields have no representation in this context
            if field.write_only {
                continue;
            }

            match &field.kind {
                FieldKind::Scalar => {
                    // Sparse document: absent and null values are omitted
                    if let Some(value) = entity.attr_non_null(field.name) {
                        doc.insert(field.name.to_string(), value.clone());
                    }
                }
                FieldKind::Relation(def) => {
                    let Some(raw) = entity.attr_non_null(def.key_attr) else {
                        continue;
                    };

                    if depth == 0 || schema.is_ignored(field.name) {
                        // Collapsed: the raw identifier(s) under the key attribute
                        doc.insert(def.key_attr.to_string(), raw.clone());
                    } else {
                        let raw = raw.clone();
                        if let Some(nested) =
                            self.expand(entity, schema, field, def, &raw, depth - 1)?
                        {
                            doc.insert(field.name.to_string(), nested);
                        }
                    }
                }
            }
        }

        Ok(doc)
    }

    /// Expand one relation field into nested document(s) at the remaining
    /// depth. Returns `None` when there is nothing to emit.
    fn expand(
        &self,
        entity: &Entity,
        schema: &Schema,
        field: &Field,
        def: &RelationDef,
        raw: &Value,
        remaining: u32,
    ) -> Result<Option<Value>, SerializeError> {
        let nested_kind = schema
            .nested_schema_kind(field.name)
            .unwrap_or(def.remote_kind);
        let nested_schema = self.registry.get(nested_kind);

        if def.many {
            // One lookup per id; the single-target resolver cache does not
            // apply to collections.
            let Some(ids) = raw.as_array() else {
                return Err(RelationError::TypeMismatch {
                    key_attr: def.key_attr,
                    expected: "a list of integer keys".to_string(),
                    found: value_type_name(raw).to_string(),
                }
                .into());
            };

            let mut docs = Vec::with_capacity(ids.len());
            for id in ids {
                if !id.is_i64() && !id.is_u64() {
                    return Err(RelationError::TypeMismatch {
                        key_attr: def.key_attr,
                        expected: "an integer key".to_string(),
                        found: value_type_name(id).to_string(),
                    }
                    .into());
                }

                let target = self
                    .store
                    .find_by_key(def.remote_kind, def.remote_key, id)?
                    .ok_or(RelationError::ReferenceNotFound {
                        remote_kind: def.remote_kind,
                        remote_key: def.remote_key,
                        key: id.clone(),
                    })?;

                docs.push(self.serialize_related(&target, nested_schema, remaining)?);
            }
            Ok(Some(Value::Array(docs)))
        } else {
            match relations::resolve(entity, def, self.store)? {
                Some(target) => Ok(Some(self.serialize_related(
                    &target,
                    nested_schema,
                    remaining,
                )?)),
                None => Ok(None),
            }
        }
    }

    /// Serialize a related entity with the nested schema, or fall back to its
    /// raw attributes when no schema is registered for the remote kind.
    fn serialize_related(
        &self,
        target: &Entity,
        nested_schema: Option<&Schema>,
        remaining: u32,
    ) -> Result<Value, SerializeError> {
        match nested_schema {
            Some(schema) => {
                // Nested depth never exceeds the nested schema's own max
                let depth = remaining.min(schema.max_depth);
                Ok(Value::Object(self.serialize_at(
                    target, schema, depth, None,
                )?))
            }
            None => {
                // Auto-derived: a dynamic record's declared field set is its
                // attribute set, emitted sparse and unexpanded.
                let attrs: Map<String, Value> = target
                    .attrs()
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(Value::Object(attrs))
            }
        }
    }
}

/// Clamp a requested depth into `0..=max_depth`, or fall back to the schema
/// default when no depth was requested.
pub fn effective_depth(schema: &Schema, requested: Option<i64>) -> u32 {
    match requested {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        Some(depth) => depth.clamp(0, i64::from(schema.max_depth)) as u32,
        None => schema.default_depth,
    }
}

/// The active field list: the accepted client subset in requested order, or
/// the schema's declared list.
fn active_fields<'s>(schema: &'s Schema, requested: Option<&[String]>) -> Vec<&'s Field> {
    match requested {
        Some(names) => names
            .iter()
            .filter_map(|name| {
                let field = schema.field(name);
                if field.is_none() {
                    warn!(
                        "Unknown field '{}' requested for '{}', ignoring",
                        name, schema.kind
                    );
                }
                field
            })
            .collect(),
        None => schema.fields.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::schema;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, 0)] // schema default
    #[case(Some(0), 0)]
    #[case(Some(1), 1)]
    #[case(Some(6), 1)] // clamped to max_depth
    #[case(Some(-1), 0)] // negative clamps to floor
    fn test_effective_depth(#[case] requested: Option<i64>, #[case] expected: u32) {
        assert_eq!(effective_depth(&schema::POST, requested), expected);
    }

    #[test]
    fn test_depth_zero_collapses_relations_to_ids() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let post = fixtures::post();
        let doc = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new())
            .unwrap();

        assert_eq!(doc.get("author_id"), Some(&json!(7)));
        assert_eq!(doc.get("comment_ids"), Some(&json!([3])));
        assert!(doc.get("author").is_none());
        assert!(doc.get("comments").is_none());
        // Collapsing performs no store lookups at all
        assert_eq!(store.lookup_count(), 0);
    }

    #[test]
    fn test_depth_one_expands_comments_but_never_author() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let post = fixtures::post();
        let doc = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(1))
            .unwrap();

        // Excluded field: raw id even though depth allows expansion
        assert_eq!(doc.get("author_id"), Some(&json!(7)));
        assert!(doc.get("author").is_none());

        // Comments fully expanded at depth 0
        let comments = doc.get("comments").unwrap().as_array().unwrap();
        assert_eq!(comments.len(), 1);
        let comment = comments[0].as_object().unwrap();
        assert_eq!(comment.get("id"), Some(&json!(3)));
        assert_eq!(comment.get("desc"), Some(&json!("Nice post!")));
        // Nested document is at depth 0: its own relations are collapsed
        assert_eq!(comment.get("post_id"), Some(&json!(1)));
        assert!(comment.get("post").is_none());
    }

    #[test]
    fn test_clamping_idempotence() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);
        let post = fixtures::post();

        let at_max = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(1))
            .unwrap();
        let beyond_max = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(6))
            .unwrap();
        assert_eq!(at_max, beyond_max);
    }

    #[test]
    fn test_negative_depth_behaves_like_zero() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);
        let post = fixtures::post();

        let at_zero = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(0))
            .unwrap();
        let below_zero = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(-1))
            .unwrap();
        assert_eq!(at_zero, below_zero);
    }

    #[test]
    fn test_null_fields_are_omitted() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let comment = Entity::new("comment")
            .with_attr("id", json!(9))
            .with_attr("post_id", json!(1))
            .with_attr("desc", Value::Null)
            .with_attr("comment_id", Value::Null);

        let doc = serializer
            .serialize(&comment, &schema::COMMENT, &SerializeOptions::new())
            .unwrap();

        assert!(doc.get("desc").is_none());
        assert!(doc.get("comment_id").is_none());
        assert!(doc.get("comment").is_none());
        assert_eq!(doc.get("id"), Some(&json!(9)));
    }

    #[test]
    fn test_write_only_field_is_skipped() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let user = fixtures::user_ada().with_attr("password", json!("hunter2"));
        let doc = serializer
            .serialize(&user, &schema::USER, &SerializeOptions::new())
            .unwrap();

        assert!(doc.get("password").is_none());
        assert_eq!(doc.get("username"), Some(&json!("ada")));
    }

    #[test]
    fn test_output_preserves_field_order() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let doc = serializer
            .serialize(&fixtures::post(), &schema::POST, &SerializeOptions::new())
            .unwrap();
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "title",
                "author_id",
                "desc",
                "comment_ids",
                "created_on",
                "updated_on"
            ]
        );
    }

    #[test]
    fn test_requested_fields_subset_in_requested_order() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let options = SerializeOptions::new().with_fields(["title", "id"]);
        let doc = serializer
            .serialize(&fixtures::post(), &schema::POST, &options)
            .unwrap();

        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["title", "id"]);
    }

    #[test]
    fn test_unknown_requested_fields_are_ignored() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let options = SerializeOptions::new().with_fields(["id", "nonexistent"]);
        let doc = serializer
            .serialize(&fixtures::post(), &schema::POST, &options)
            .unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_requested_fields_do_not_propagate_to_nested_documents() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let options = SerializeOptions::new()
            .with_depth(1)
            .with_fields(["comments"]);
        let doc = serializer
            .serialize(&fixtures::post(), &schema::POST, &options)
            .unwrap();

        let comments = doc.get("comments").unwrap().as_array().unwrap();
        let comment = comments[0].as_object().unwrap();
        // The nested comment uses its full schema field list
        assert!(comment.get("desc").is_some());
        assert!(comment.get("post_id").is_some());
    }

    #[test]
    fn test_dangling_reference_surfaces() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let comment = Entity::new("comment")
            .with_attr("id", json!(9))
            .with_attr("post_id", json!(404));

        let err = serializer
            .serialize(
                &comment,
                &schema::COMMENT,
                &SerializeOptions::new().with_depth(1),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Relation(RelationError::ReferenceNotFound { .. })
        ));
    }

    #[test]
    fn test_many_relation_with_non_list_key_is_type_mismatch() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let post = Entity::new("post")
            .with_attr("id", json!(2))
            .with_attr("comment_ids", json!(3));

        let err = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(1))
            .unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Relation(RelationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_many_relation_expands_to_empty_array() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let post = Entity::new("post")
            .with_attr("id", json!(2))
            .with_attr("title", json!("No comments yet"))
            .with_attr("comment_ids", json!([]));

        let doc = serializer
            .serialize(&post, &schema::POST, &SerializeOptions::new().with_depth(1))
            .unwrap();
        assert_eq!(doc.get("comments"), Some(&json!([])));
    }

    #[test]
    fn test_comment_parent_expansion_uses_self_schema() {
        let store = fixtures::blog_store();
        let registry = fixtures::registry();
        let serializer = Serializer::new(&registry, &store);

        let reply = fixtures::reply();
        let doc = serializer
            .serialize(
                &reply,
                &schema::COMMENT,
                &SerializeOptions::new().with_depth(1),
            )
            .unwrap();

        let parent = doc.get("comment").unwrap().as_object().unwrap();
        assert_eq!(parent.get("id"), Some(&json!(3)));
        // Parent rendered at depth 0: its own relations collapsed
        assert_eq!(parent.get("post_id"), Some(&json!(1)));
        assert_eq!(parent.get("author_id"), Some(&json!(8)));
    }

    #[test]
    fn test_unregistered_remote_kind_falls_back_to_raw_attributes() {
        let config = crate::config::CoreConfig::default();
        let mut registry = SchemaRegistry::new(&config);
        registry.register(&schema::POST).unwrap();
        // No "user" or "comment" schema registered

        let mut store = fixtures::blog_store();
        store.clear_kind("comment");
        store.insert(
            Entity::new("comment")
                .with_attr("id", json!(3))
                .with_attr("desc", json!("Nice post!"))
                .with_attr("internal_note", json!("keep")),
        );

        let serializer = Serializer::new(&registry, &store);
        let doc = serializer
            .serialize(
                &fixtures::post(),
                &schema::POST,
                &SerializeOptions::new().with_depth(1),
            )
            .unwrap();

        let comments = doc.get("comments").unwrap().as_array().unwrap();
        let comment = comments[0].as_object().unwrap();
        // Flat dump of the record's attributes
        assert_eq!(comment.get("internal_note"), Some(&json!("keep")));
    }
}
