//! Entity trait implementation for the Post domain type.
//!
//! Includes the view-count and publish actions.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::framework::entity::check_text;
use crate::framework::{Entity, Sortable, StoreError, Timestamps};
use crate::model::{Post, PostAction, PostActionResult, PostCreate, PostId, PostUpdate};

impl Entity for Post {
    type Id = PostId;
    type Create = PostCreate;
    type Update = PostUpdate;
    type Action = PostAction;
    type ActionResult = PostActionResult;

    const NAME: &'static str = "Post";

    fn from_create_params(id: PostId, params: PostCreate, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            title: params.title,
            content: params.content,
            view_count: 0,
            published: false,
            author_id: params.author_id,
            timestamps: Timestamps::new(now),
        })
    }

    fn on_update(&mut self, update: PostUpdate) -> Result<(), StoreError> {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        Ok(())
    }

    /// Publish and unpublish are idempotent: repeating them succeeds and
    /// reports that nothing changed.
    fn handle_action(&mut self, action: PostAction) -> Result<PostActionResult, StoreError> {
        match action {
            PostAction::IncrementViewCount => {
                self.view_count += 1;
                Ok(PostActionResult::IncrementViewCount(self.view_count))
            }
            PostAction::ResetViewCount => {
                Ok(PostActionResult::ResetViewCount(std::mem::take(&mut self.view_count)))
            }
            PostAction::Publish => {
                let changed = !self.published;
                self.published = true;
                Ok(PostActionResult::Publish(changed))
            }
            PostAction::Unpublish => {
                let changed = self.published;
                self.published = false;
                Ok(PostActionResult::Unpublish(changed))
            }
        }
    }

    fn id(&self) -> PostId {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn validate(&self) -> Result<(), StoreError> {
        check_text(Self::NAME, "title", &self.title, Some(200))
    }
}

impl Sortable for Post {
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "viewCount",
        "view_count",
        "published",
        "createdAt",
        "created_at",
        "updatedAt",
        "updated_at",
    ];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "id" => self.id.cmp(&other.id),
            "title" => self.title.cmp(&other.title),
            "viewCount" | "view_count" => self.view_count.cmp(&other.view_count),
            "published" => self.published.cmp(&other.published),
            "createdAt" | "created_at" => self.timestamps.created_at.cmp(&other.timestamps.created_at),
            "updatedAt" | "updated_at" => self.timestamps.updated_at.cmp(&other.timestamps.updated_at),
            _ => Ordering::Equal,
        }
    }
}
