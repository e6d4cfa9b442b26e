//! blog_core library - Entity serialization core for the blogging backend
//!
//! Provides depth-bounded nested serialization of entity graphs and
//! soft foreign-key resolution against a pluggable entity store.

pub mod config;
pub mod entity;
pub mod options;
pub mod registry;
pub mod relations;
pub mod schema;
pub mod serializer;
pub mod store;

#[cfg(test)]
pub mod fixtures;
