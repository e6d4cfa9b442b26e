//! Explicit schema registry.
//!
//! Maps entity-kind names to their schemas. The registry is constructed once
//! at application startup and passed to the serializer by reference; there is
//! deliberately no process-wide table mutated at import time, so its lifetime
//! is owned by the composing application.

use std::collections::BTreeMap;

use crate::config::CoreConfig;
use crate::schema::{self, Schema, SchemaError};

/// Registry of schemas, keyed by entity kind.
#[derive(Debug)]
pub struct SchemaRegistry {
    hard_max_depth: u32,
    schemas: BTreeMap<&'static str, &'static Schema>,
}

impl SchemaRegistry {
    /// Create an empty registry bound to the configured hard depth cap.
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            hard_max_depth: config.hard_max_depth,
            schemas: BTreeMap::new(),
        }
    }

    /// Create a registry with all blog schemas registered.
    pub fn with_blog_schemas(config: &CoreConfig) -> Result<Self, SchemaError> {
        let mut registry = Self::new(config);
        for schema in schema::ALL_SCHEMAS {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Register a schema, validating its static configuration.
    ///
    /// # Errors
    ///
    /// Fails fast with `SchemaError::Configuration` if the schema's default
    /// depth exceeds its own max, with `SchemaError::HardCapExceeded` if its
    /// max exceeds the configured cap, and with `SchemaError::Duplicate` if a
    /// schema for the same kind is already registered.
    pub fn register(&mut self, schema: &'static Schema) -> Result<(), SchemaError> {
        schema.validate(self.hard_max_depth)?;

        if self.schemas.contains_key(schema.kind) {
            return Err(SchemaError::Duplicate { kind: schema.kind });
        }

        self.schemas.insert(schema.kind, schema);
        Ok(())
    }

    /// Look up the schema registered for an entity kind.
    pub fn get(&self, kind: &str) -> Option<&'static Schema> {
        self.schemas.get(kind).copied()
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
