//! Entity trait implementation for the Comment domain type.

use chrono::{DateTime, Utc};
use std::convert::Infallible;

use crate::framework::entity::check_text;
use crate::framework::{Entity, StoreError, Timestamps};
use crate::model::{Comment, CommentCreate, CommentId, CommentUpdate};

impl Entity for Comment {
    type Id = CommentId;
    type Create = CommentCreate;
    type Update = CommentUpdate;
    // Comments have no transitions beyond editing their text.
    type Action = Infallible;
    type ActionResult = ();

    const NAME: &'static str = "Comment";

    fn from_create_params(id: CommentId, params: CommentCreate, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            content: params.content,
            post_id: params.post_id,
            user_id: params.user_id,
            timestamps: Timestamps::new(now),
        })
    }

    fn on_update(&mut self, update: CommentUpdate) -> Result<(), StoreError> {
        self.content = update.content;
        Ok(())
    }

    fn handle_action(&mut self, action: Infallible) -> Result<(), StoreError> {
        match action {}
    }

    fn id(&self) -> CommentId {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn validate(&self) -> Result<(), StoreError> {
        check_text(Self::NAME, "content", &self.content, None)
    }
}
