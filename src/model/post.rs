use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::framework::Timestamps;
use crate::model::{Comment, User, UserId};

/// Type-safe identifier for Posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(pub u64);

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "post_{}", self.0)
    }
}

/// A blog post. Always has an author; owns its comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: Option<String>,
    pub view_count: u64,
    pub published: bool,
    pub author_id: UserId,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Payload for creating a new post. New posts are unpublished with no views.
#[derive(Debug, Clone)]
pub struct PostCreate {
    pub author_id: UserId,
    pub title: String,
    pub content: Option<String>,
}

/// Payload for editing a post's text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
}

/// Custom actions for Post entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    IncrementViewCount,
    /// The only way the view count may go down.
    ResetViewCount,
    Publish,
    Unpublish,
}

/// Results from PostActions - variants match 1:1 with PostAction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostActionResult {
    /// The view count after the increment.
    IncrementViewCount(u64),
    /// The view count before the reset.
    ResetViewCount(u64),
    /// Whether the flag actually changed.
    Publish(bool),
    /// Whether the flag actually changed.
    Unpublish(bool),
}

impl PostActionResult {
    /// Whether the action changed the stored post.
    pub fn changed(&self) -> bool {
        match *self {
            PostActionResult::IncrementViewCount(_) => true,
            PostActionResult::ResetViewCount(previous) => previous > 0,
            PostActionResult::Publish(changed) | PostActionResult::Unpublish(changed) => changed,
        }
    }
}

/// A post with its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: User,
}

/// A post with its author and comments, loaded in one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithRelations {
    pub post: Post,
    pub author: User,
    pub comments: Vec<Comment>,
}
