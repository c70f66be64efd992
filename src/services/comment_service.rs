//! # Comment Service

use tracing::{info, instrument};

use super::error::ServiceError;
use super::validation::require_text;
use crate::model::{Comment, CommentCreate, CommentId, CommentUpdate, CommentWithRelations, PostId, UserId};
use crate::store::StoreClient;

#[derive(Clone)]
pub struct CommentService {
    store: StoreClient,
}

impl CommentService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Fails with `NotFound` if either the post or the user is missing.
    #[instrument(skip(self))]
    pub async fn create_comment(
        &self,
        post_id: PostId,
        user_id: UserId,
        content: String,
    ) -> Result<Comment, ServiceError> {
        require_text("content", &content)?;
        let params = CommentCreate {
            post_id,
            user_id,
            content,
        };
        let comment = self
            .store
            .write("create_comment", move |uow| -> Result<Comment, ServiceError> {
                uow.db().posts().get(post_id)?;
                uow.db().users().get(user_id)?;
                Ok(uow.insert::<Comment>(params)?)
            })
            .await?;
        info!(%comment.id, %post_id, %user_id, "Comment created");
        Ok(comment)
    }

    #[instrument(skip(self))]
    pub async fn get_comment(&self, id: CommentId) -> Result<Comment, ServiceError> {
        self.store
            .read("get_comment", move |db| -> Result<_, ServiceError> {
                Ok(db.comments().get(id)?)
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_comment(&self, id: CommentId, content: String) -> Result<Comment, ServiceError> {
        require_text("content", &content)?;
        self.store
            .write("update_comment", move |uow| -> Result<_, ServiceError> {
                Ok(uow.update::<Comment>(id, CommentUpdate { content })?)
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: CommentId) -> Result<(), ServiceError> {
        self.store
            .write("delete_comment", move |uow| -> Result<_, ServiceError> {
                uow.delete::<Comment>(id)?;
                Ok(())
            })
            .await
    }

    /// Detaches a comment from its post, which deletes it. Fails with
    /// `ValidationError` if the comment belongs to another post.
    #[instrument(skip(self))]
    pub async fn remove_comment_from_post(&self, post_id: PostId, comment_id: CommentId) -> Result<(), ServiceError> {
        self.store
            .write("remove_comment_from_post", move |uow| -> Result<_, ServiceError> {
                uow.db().posts().get(post_id)?;
                let comment = uow.db().comments().get(comment_id)?;
                if comment.post_id != post_id {
                    return Err(ServiceError::invalid(format!(
                        "{comment_id} belongs to {}, not {post_id}",
                        comment.post_id
                    )));
                }
                uow.delete::<Comment>(comment_id)?;
                Ok(())
            })
            .await
    }

    /// Oldest first.
    #[instrument(skip(self))]
    pub async fn get_comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ServiceError> {
        self.store
            .read("get_comments_for_post", move |db| {
                Ok(db.comments().find_by_post_id_order_by_created_at_asc(post_id))
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_comments_by_user(&self, user_id: UserId) -> Result<Vec<Comment>, ServiceError> {
        self.store
            .read("get_comments_by_user", move |db| Ok(db.comments().find_by_user_id(user_id)))
            .await
    }

    /// Comments on the post, oldest first, with authors loaded.
    #[instrument(skip(self))]
    pub async fn get_comments_with_authors(
        &self,
        post_id: PostId,
    ) -> Result<Vec<CommentWithRelations>, ServiceError> {
        self.store
            .read("get_comments_with_authors", move |db| -> Result<_, ServiceError> {
                Ok(db.comments().find_with_user_and_post(post_id)?)
            })
            .await
    }

    pub async fn count_comments_for_post(&self, post_id: PostId) -> Result<usize, ServiceError> {
        self.store
            .read("count_comments_for_post", move |db| Ok(db.comments().count_by_post_id(post_id)))
            .await
    }

    pub async fn count_comments_by_user(&self, user_id: UserId) -> Result<usize, ServiceError> {
        self.store
            .read("count_comments_by_user", move |db| Ok(db.comments().count_by_user_id(user_id)))
            .await
    }
}
