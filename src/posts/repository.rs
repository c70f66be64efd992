//! Typed queries over the posts table, plus the eager fetches that join
//! authors and comments.

use chrono::{DateTime, Utc};

use crate::framework::{Page, PageRequest, Sortable, StoreError, Table};
use crate::model::{Comment, Post, PostId, PostWithAuthor, PostWithRelations, User, UserId};
use crate::store::Database;

impl Database {
    pub fn posts(&self) -> PostRepository<'_> {
        PostRepository { db: self }
    }
}

#[derive(Clone, Copy)]
pub struct PostRepository<'a> {
    db: &'a Database,
}

impl<'a> PostRepository<'a> {
    fn table(&self) -> &'a Table<Post> {
        self.db.table::<Post>()
    }

    fn filter(&self, predicate: impl Fn(&Post) -> bool) -> Vec<Post> {
        self.table().iter().filter(|post| predicate(post)).cloned().collect()
    }

    pub fn get(&self, id: PostId) -> Result<Post, StoreError> {
        self.table().get(id).cloned()
    }

    pub fn find_by_id(&self, id: PostId) -> Option<Post> {
        self.table().find(id).cloned()
    }

    pub fn find_all(&self) -> Vec<Post> {
        self.table().iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.table().len()
    }

    /// Case-sensitive substring match on the title.
    pub fn find_by_title_containing(&self, keyword: &str) -> Vec<Post> {
        self.filter(|post| post.title.contains(keyword))
    }

    pub fn find_by_title_containing_paged(&self, keyword: &str, request: &PageRequest) -> Page<Post> {
        Page::from_results(self.find_by_title_containing(keyword), request)
    }

    pub fn find_by_author_id(&self, author_id: UserId) -> Vec<Post> {
        self.filter(|post| post.author_id == author_id)
    }

    pub fn find_by_author_id_paged(&self, author_id: UserId, request: &PageRequest) -> Page<Post> {
        Page::from_results(self.find_by_author_id(author_id), request)
    }

    pub fn find_by_published(&self, published: bool) -> Vec<Post> {
        self.filter(|post| post.published == published)
    }

    /// Newest first.
    pub fn find_published_order_by_created_at_desc(&self) -> Vec<Post> {
        let mut posts = self.find_by_published(true);
        posts.sort_by(|a, b| b.compare_by(a, "createdAt"));
        posts
    }

    pub fn find_published(&self, request: &PageRequest) -> Page<Post> {
        Page::from_results(self.find_by_published(true), request)
    }

    /// Inclusive on both ends.
    pub fn find_by_created_at_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Post> {
        self.filter(|post| (start..=end).contains(&post.timestamps.created_at))
    }

    pub fn find_by_view_count_greater_than(&self, view_count: u64) -> Vec<Post> {
        self.filter(|post| post.view_count > view_count)
    }

    pub fn find_by_author_and_published(&self, author_id: UserId, published: bool) -> Vec<Post> {
        self.filter(|post| post.author_id == author_id && post.published == published)
    }

    /// Case-sensitive substring match on the title or the content.
    pub fn search_by_title_or_content(&self, keyword: &str) -> Vec<Post> {
        self.filter(|post| {
            post.title.contains(keyword)
                || post
                    .content
                    .as_deref()
                    .is_some_and(|content| content.contains(keyword))
        })
    }

    pub fn count_by_author_id(&self, author_id: UserId) -> usize {
        self.table()
            .iter()
            .filter(|post| post.author_id == author_id)
            .count()
    }

    pub fn count_by_published(&self, published: bool) -> usize {
        self.table()
            .iter()
            .filter(|post| post.published == published)
            .count()
    }

    /// Published posts, newest first, each with its author.
    pub fn find_all_published_with_author(&self) -> Result<Vec<PostWithAuthor>, StoreError> {
        let users = self.db.table::<User>();
        self.find_published_order_by_created_at_desc()
            .into_iter()
            .map(|post| -> Result<PostWithAuthor, StoreError> {
                let author = users.get(post.author_id)?.clone();
                Ok(PostWithAuthor { post, author })
            })
            .collect()
    }

    /// The post with its author and its comments (oldest first).
    pub fn find_with_comments_and_author(&self, id: PostId) -> Result<PostWithRelations, StoreError> {
        let post = self.get(id)?;
        let author = self.db.table::<User>().get(post.author_id)?.clone();
        let mut comments: Vec<Comment> = self
            .db
            .table::<Comment>()
            .iter()
            .filter(|comment| comment.post_id == id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| comment.timestamps.created_at);
        Ok(PostWithRelations {
            post,
            author,
            comments,
        })
    }
}
