//! Blog entity schema definitions.
//!
//! This module declares the three schemas of the blog data model: users,
//! posts, and comments. Depth limits and exclusions follow the product rules:
//! the acting user behind a post or comment is exposed as a raw `author_id`
//! and never expanded, while comment threads expand one level at a time.

use super::definition::{Field, FieldKind, RelationDef, Schema};

/// User schema: account holders
///
/// Scalar-only; the password is write-only and never serialized.
pub static USER: Schema = Schema {
    kind: "user",
    fields: &[
        Field {
            name: "id",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "username",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "first_name",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "last_name",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "email",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "mobile",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "is_email_verified",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "is_mobile_verified",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "password",
            kind: FieldKind::Scalar,
            write_only: true,
        },
    ],
    default_depth: 0,
    max_depth: 1,
    ignore_depth_fields: &[],
    nested_schemas: &[],
};

/// Post schema: top-level articles
///
/// The author relation is never expanded (it would pull account data into
/// every post document); comments expand when depth allows.
pub static POST: Schema = Schema {
    kind: "post",
    fields: &[
        Field {
            name: "id",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "title",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "author",
            kind: FieldKind::Relation(RelationDef {
                key_attr: "author_id",
                remote_kind: "user",
                remote_key: "id",
                many: false,
                required: false,
            }),
            write_only: false,
        },
        Field {
            name: "desc",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "comments",
            kind: FieldKind::Relation(RelationDef {
                key_attr: "comment_ids",
                remote_kind: "comment",
                remote_key: "id",
                many: true,
                required: false,
            }),
            write_only: false,
        },
        Field {
            name: "created_on",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "updated_on",
            kind: FieldKind::Scalar,
            write_only: false,
        },
    ],
    default_depth: 0,
    max_depth: 1,
    ignore_depth_fields: &["author"],
    nested_schemas: &[],
};

/// Comment schema: comments on posts, threadable via a self-reference
///
/// `post` is a required relation; `comment` points at the parent comment for
/// replies. The author is excluded from expansion like on posts.
pub static COMMENT: Schema = Schema {
    kind: "comment",
    fields: &[
        Field {
            name: "id",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "post",
            kind: FieldKind::Relation(RelationDef {
                key_attr: "post_id",
                remote_kind: "post",
                remote_key: "id",
                many: false,
                required: true,
            }),
            write_only: false,
        },
        Field {
            name: "author",
            kind: FieldKind::Relation(RelationDef {
                key_attr: "author_id",
                remote_kind: "user",
                remote_key: "id",
                many: false,
                required: false,
            }),
            write_only: false,
        },
        Field {
            name: "desc",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "comment",
            kind: FieldKind::Relation(RelationDef {
                key_attr: "comment_id",
                remote_kind: "comment",
                remote_key: "id",
                many: false,
                required: false,
            }),
            write_only: false,
        },
        Field {
            name: "approved_comment",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "created_on",
            kind: FieldKind::Scalar,
            write_only: false,
        },
        Field {
            name: "updated_on",
            kind: FieldKind::Scalar,
            write_only: false,
        },
    ],
    default_depth: 0,
    max_depth: 1,
    ignore_depth_fields: &["author"],
    nested_schemas: &[],
};

/// All blog schemas for easy registration.
pub static ALL_SCHEMAS: &[&Schema] = &[&USER, &POST, &COMMENT];
