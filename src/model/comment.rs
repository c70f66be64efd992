use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::framework::Timestamps;
use crate::model::{Post, PostId, User, UserId};

/// Type-safe identifier for Comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl From<u64> for CommentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "comment_{}", self.0)
    }
}

/// A comment on a post. Its lifecycle follows the post; `user_id` is a plain
/// reference to the author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub post_id: PostId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Payload for creating a new comment.
#[derive(Debug, Clone)]
pub struct CommentCreate {
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
}

/// Payload for editing a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub content: String,
}

/// A comment with its author and post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentWithRelations {
    pub comment: Comment,
    pub author: User,
    pub post: Post,
}
