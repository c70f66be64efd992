//! # Post Service
//!
//! Reading a post through [`PostService::get_post`] counts as a view and is
//! therefore a write; [`PostService::get_post_without_view`] and the eager
//! fetches are pure reads.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use super::cascade;
use super::error::ServiceError;
use super::validation::{require_page, require_period, require_text};
use crate::framework::{Page, PageRequest};
use crate::model::{
    Post, PostAction, PostCreate, PostId, PostUpdate, PostWithAuthor, PostWithRelations, UserId,
};
use crate::store::StoreClient;

#[derive(Clone)]
pub struct PostService {
    store: StoreClient,
}

impl PostService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    async fn perform(&self, label: &'static str, id: PostId, action: PostAction) -> Result<Post, ServiceError> {
        let (post, result) = self
            .store
            .write(label, move |uow| -> Result<_, ServiceError> {
                Ok(uow.perform_action::<Post>(id, action)?)
            })
            .await?;
        debug!(%id, ?result, changed = result.changed(), "Action applied");
        Ok(post)
    }

    /// Creates an unpublished post with no views. Fails with `NotFound` if
    /// the author does not exist.
    #[instrument(skip(self))]
    pub async fn create_post(
        &self,
        author_id: UserId,
        title: String,
        content: Option<String>,
    ) -> Result<Post, ServiceError> {
        require_text("title", &title)?;
        let params = PostCreate {
            author_id,
            title,
            content,
        };
        let post = self
            .store
            .write("create_post", move |uow| -> Result<Post, ServiceError> {
                uow.db().users().get(author_id)?;
                Ok(uow.insert::<Post>(params)?)
            })
            .await?;
        info!(%post.id, %author_id, "Post created");
        Ok(post)
    }

    /// Returns the post and records one view.
    #[instrument(skip(self))]
    pub async fn get_post(&self, id: PostId) -> Result<Post, ServiceError> {
        self.perform("get_post", id, PostAction::IncrementViewCount).await
    }

    #[instrument(skip(self))]
    pub async fn get_post_without_view(&self, id: PostId) -> Result<Post, ServiceError> {
        self.store
            .read("get_post_without_view", move |db| -> Result<_, ServiceError> {
                Ok(db.posts().get(id)?)
            })
            .await
    }

    /// The post with its author and comments. Does not count as a view.
    #[instrument(skip(self))]
    pub async fn get_post_with_comments(&self, id: PostId) -> Result<PostWithRelations, ServiceError> {
        self.store
            .read("get_post_with_comments", move |db| -> Result<_, ServiceError> {
                Ok(db.posts().find_with_comments_and_author(id)?)
            })
            .await
    }

    pub async fn get_all_posts(&self) -> Result<Vec<Post>, ServiceError> {
        self.store
            .read("get_all_posts", |db| Ok(db.posts().find_all()))
            .await
    }

    /// Newest first.
    pub async fn get_published_posts(&self) -> Result<Vec<Post>, ServiceError> {
        self.store
            .read("get_published_posts", |db| {
                Ok(db.posts().find_published_order_by_created_at_desc())
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_published_posts_paged(&self, request: PageRequest) -> Result<Page<Post>, ServiceError> {
        require_page::<Post>(&request)?;
        self.store
            .read("get_published_posts_paged", move |db| Ok(db.posts().find_published(&request)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_posts_by_title(&self, keyword: String) -> Result<Vec<Post>, ServiceError> {
        self.store
            .read("search_posts_by_title", move |db| {
                Ok(db.posts().find_by_title_containing(&keyword))
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_posts_by_title_paged(
        &self,
        keyword: String,
        request: PageRequest,
    ) -> Result<Page<Post>, ServiceError> {
        require_page::<Post>(&request)?;
        self.store
            .read("search_posts_by_title_paged", move |db| {
                Ok(db.posts().find_by_title_containing_paged(&keyword, &request))
            })
            .await
    }

    /// Matches the keyword in the title or the content.
    #[instrument(skip(self))]
    pub async fn search_posts(&self, keyword: String) -> Result<Vec<Post>, ServiceError> {
        self.store
            .read("search_posts", move |db| Ok(db.posts().search_by_title_or_content(&keyword)))
            .await
    }

    /// Empty for an unknown author.
    #[instrument(skip(self))]
    pub async fn get_posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>, ServiceError> {
        self.store
            .read("get_posts_by_author", move |db| Ok(db.posts().find_by_author_id(author_id)))
            .await
    }

    /// Fails with `NotFound` for an unknown author.
    #[instrument(skip(self))]
    pub async fn get_posts_by_author_paged(
        &self,
        author_id: UserId,
        request: PageRequest,
    ) -> Result<Page<Post>, ServiceError> {
        require_page::<Post>(&request)?;
        self.store
            .read("get_posts_by_author_paged", move |db| -> Result<_, ServiceError> {
                db.users().get(author_id)?;
                Ok(db.posts().find_by_author_id_paged(author_id, &request))
            })
            .await
    }

    /// Replaces the title and the content.
    #[instrument(skip(self))]
    pub async fn update_post(
        &self,
        id: PostId,
        title: String,
        content: Option<String>,
    ) -> Result<Post, ServiceError> {
        require_text("title", &title)?;
        let update = PostUpdate {
            title: Some(title),
            content: Some(content),
        };
        self.store
            .write("update_post", move |uow| -> Result<_, ServiceError> {
                Ok(uow.update::<Post>(id, update)?)
            })
            .await
    }

    /// Publishing a published post succeeds and changes nothing.
    #[instrument(skip(self))]
    pub async fn publish_post(&self, id: PostId) -> Result<Post, ServiceError> {
        self.perform("publish_post", id, PostAction::Publish).await
    }

    #[instrument(skip(self))]
    pub async fn unpublish_post(&self, id: PostId) -> Result<Post, ServiceError> {
        self.perform("unpublish_post", id, PostAction::Unpublish).await
    }

    #[instrument(skip(self))]
    pub async fn reset_view_count(&self, id: PostId) -> Result<Post, ServiceError> {
        self.perform("reset_view_count", id, PostAction::ResetViewCount).await
    }

    /// Deletes the post and its comments.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: PostId) -> Result<(), ServiceError> {
        let removed = self
            .store
            .write("delete_post", move |uow| -> Result<_, ServiceError> {
                Ok(cascade::delete_post(uow, id)?)
            })
            .await?;
        info!(%id, comments = removed.comments, "Post deleted");
        Ok(())
    }

    /// Posts with strictly more than `min_view_count` views.
    #[instrument(skip(self))]
    pub async fn get_popular_posts(&self, min_view_count: u64) -> Result<Vec<Post>, ServiceError> {
        self.store
            .read("get_popular_posts", move |db| {
                Ok(db.posts().find_by_view_count_greater_than(min_view_count))
            })
            .await
    }

    /// Posts created within `[start, end]`.
    #[instrument(skip(self))]
    pub async fn get_posts_by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Post>, ServiceError> {
        require_period(start, end)?;
        self.store
            .read("get_posts_by_period", move |db| {
                Ok(db.posts().find_by_created_at_between(start, end))
            })
            .await
    }

    pub async fn get_post_count_by_author(&self, author_id: UserId) -> Result<usize, ServiceError> {
        self.store
            .read("get_post_count_by_author", move |db| Ok(db.posts().count_by_author_id(author_id)))
            .await
    }

    pub async fn get_published_post_count(&self) -> Result<usize, ServiceError> {
        self.store
            .read("get_published_post_count", |db| Ok(db.posts().count_by_published(true)))
            .await
    }

    pub async fn get_total_post_count(&self) -> Result<usize, ServiceError> {
        self.store
            .read("get_total_post_count", |db| Ok(db.posts().count()))
            .await
    }

    /// Published posts, newest first, with their authors loaded.
    pub async fn get_published_posts_with_author(&self) -> Result<Vec<PostWithAuthor>, ServiceError> {
        self.store
            .read("get_published_posts_with_author", |db| -> Result<_, ServiceError> {
                Ok(db.posts().find_all_published_with_author()?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostActionResult;
    use crate::store::mock::{create_mock_client, expect_labelled};

    #[tokio::test]
    async fn test_get_post_is_a_write_and_the_plain_read_is_not() {
        let (client, mut receiver) = create_mock_client(4);
        let service = PostService::new(client);

        let viewing = service.clone();
        tokio::spawn(async move { viewing.get_post(PostId(1)).await });
        let request = expect_labelled(&mut receiver, "get_post").await.unwrap();
        assert!(request.is_write());

        let reading = service.clone();
        tokio::spawn(async move { reading.get_post_without_view(PostId(1)).await });
        let request = expect_labelled(&mut receiver, "get_post_without_view").await.unwrap();
        assert!(!request.is_write());
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_the_store() {
        let (client, mut receiver) = create_mock_client(4);
        let service = PostService::new(client);

        assert!(matches!(
            service.create_post(UserId(1), "  ".into(), None).await,
            Err(ServiceError::ValidationError(_))
        ));
        let later = Utc::now();
        let earlier = later - chrono::Duration::days(1);
        assert!(matches!(
            service.get_posts_by_period(later, earlier).await,
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.get_published_posts_paged(PageRequest::first(0)).await,
            Err(ServiceError::ValidationError(_))
        ));

        drop(service);
        assert!(receiver.recv().await.is_none());
    }

    #[test]
    fn test_action_results_report_changes() {
        assert!(PostActionResult::Publish(true).changed());
        assert!(!PostActionResult::Unpublish(false).changed());
        assert!(!PostActionResult::ResetViewCount(0).changed());
    }
}
