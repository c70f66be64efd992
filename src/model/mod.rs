//! Plain data: records, typed ids, payloads (DTOs), actions and the
//! projections returned by eager fetches.
//!
//! Relations are expressed by id (`Post::author_id`, `Comment::post_id`);
//! related records are loaded through the repositories.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::*;
pub use post::*;
pub use user::*;
