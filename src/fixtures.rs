//! Shared test fixtures: a small blog entity graph.
//!
//! Two users, one post, one comment and one reply to it, plus a populated
//! in-memory store and a registry with all blog schemas. Entities returned by
//! the free functions are fresh instances with empty resolution caches.

use serde_json::json;

use crate::config::CoreConfig;
use crate::entity::Entity;
use crate::registry::SchemaRegistry;
use crate::store::MemoryStore;

/// User 7, author of the post.
pub fn user_ada() -> Entity {
    Entity::new("user")
        .with_attr("id", json!(7))
        .with_attr("username", json!("ada"))
        .with_attr("first_name", json!("Ada"))
        .with_attr("last_name", json!("Lovelace"))
        .with_attr("email", json!("ada@example.com"))
        .with_attr("is_email_verified", json!(true))
        .with_attr("is_mobile_verified", json!(false))
}

/// User 8, author of the comment.
pub fn user_grace() -> Entity {
    Entity::new("user")
        .with_attr("id", json!(8))
        .with_attr("username", json!("grace"))
        .with_attr("first_name", json!("Grace"))
        .with_attr("last_name", json!("Hopper"))
        .with_attr("email", json!("grace@example.com"))
        .with_attr("is_email_verified", json!(true))
        .with_attr("is_mobile_verified", json!(true))
}

/// Post 1 by user 7, carrying comment 3.
pub fn post() -> Entity {
    Entity::new("post")
        .with_attr("id", json!(1))
        .with_attr("title", json!("On the Analytical Engine"))
        .with_attr("author_id", json!(7))
        .with_attr("desc", json!("Notes on programmable machines."))
        .with_attr("comment_ids", json!([3]))
        .with_attr("created_on", json!("2024-05-01T10:00:00Z"))
        .with_attr("updated_on", json!("2024-05-02T09:30:00Z"))
}

/// Comment 3 on post 1, by user 8.
pub fn comment() -> Entity {
    Entity::new("comment")
        .with_attr("id", json!(3))
        .with_attr("post_id", json!(1))
        .with_attr("author_id", json!(8))
        .with_attr("desc", json!("Nice post!"))
        .with_attr("approved_comment", json!(true))
        .with_attr("created_on", json!("2024-05-03T12:00:00Z"))
        .with_attr("updated_on", json!("2024-05-03T12:00:00Z"))
}

/// Comment 4, a reply to comment 3.
pub fn reply() -> Entity {
    Entity::new("comment")
        .with_attr("id", json!(4))
        .with_attr("post_id", json!(1))
        .with_attr("author_id", json!(7))
        .with_attr("desc", json!("Thank you!"))
        .with_attr("comment_id", json!(3))
        .with_attr("approved_comment", json!(true))
        .with_attr("created_on", json!("2024-05-04T08:00:00Z"))
        .with_attr("updated_on", json!("2024-05-04T08:00:00Z"))
}

/// An in-memory store holding the whole fixture graph.
pub fn blog_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(user_ada());
    store.insert(user_grace());
    store.insert(post());
    store.insert(comment());
    store.insert(reply());
    store
}

/// A registry with all blog schemas and the default hard depth cap.
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::with_blog_schemas(&CoreConfig::default())
        .expect("blog schemas are statically valid")
}
