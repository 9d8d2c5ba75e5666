//! Posts service rules.
//!
//! Besides posts themselves, the posts datastore carries the `users` and
//! `categories` that posts reference; their create hooks live here too.

pub mod post;

pub use post::{CATEGORIES, POST_STATUSES, POSTS, Post, PostRules, PostService, USERS};
