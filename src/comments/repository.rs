//! Typed queries over the comments table.

use crate::framework::{StoreError, Table};
use crate::model::{Comment, CommentId, CommentWithRelations, Post, PostId, User, UserId};
use crate::store::Database;

impl Database {
    pub fn comments(&self) -> CommentRepository<'_> {
        CommentRepository { db: self }
    }
}

#[derive(Clone, Copy)]
pub struct CommentRepository<'a> {
    db: &'a Database,
}

impl<'a> CommentRepository<'a> {
    fn table(&self) -> &'a Table<Comment> {
        self.db.table::<Comment>()
    }

    fn filter(&self, predicate: impl Fn(&Comment) -> bool) -> Vec<Comment> {
        self.table().iter().filter(|comment| predicate(comment)).cloned().collect()
    }

    pub fn get(&self, id: CommentId) -> Result<Comment, StoreError> {
        self.table().get(id).cloned()
    }

    pub fn find_by_id(&self, id: CommentId) -> Option<Comment> {
        self.table().find(id).cloned()
    }

    pub fn find_all(&self) -> Vec<Comment> {
        self.table().iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.table().len()
    }

    pub fn find_by_post_id(&self, post_id: PostId) -> Vec<Comment> {
        self.filter(|comment| comment.post_id == post_id)
    }

    pub fn find_by_user_id(&self, user_id: UserId) -> Vec<Comment> {
        self.filter(|comment| comment.user_id == user_id)
    }

    /// Oldest first; ties keep id order.
    pub fn find_by_post_id_order_by_created_at_asc(&self, post_id: PostId) -> Vec<Comment> {
        let mut comments = self.find_by_post_id(post_id);
        comments.sort_by_key(|comment| comment.timestamps.created_at);
        comments
    }

    pub fn count_by_post_id(&self, post_id: PostId) -> usize {
        self.table().iter().filter(|comment| comment.post_id == post_id).count()
    }

    pub fn count_by_user_id(&self, user_id: UserId) -> usize {
        self.table().iter().filter(|comment| comment.user_id == user_id).count()
    }

    /// Comments on `post_id`, oldest first, each with its author and post.
    pub fn find_with_user_and_post(&self, post_id: PostId) -> Result<Vec<CommentWithRelations>, StoreError> {
        let post = self.db.table::<Post>().get(post_id)?.clone();
        let users = self.db.table::<User>();
        self.find_by_post_id_order_by_created_at_asc(post_id)
            .into_iter()
            .map(|comment| -> Result<CommentWithRelations, StoreError> {
                let author = users.get(comment.user_id)?.clone();
                Ok(CommentWithRelations {
                    comment,
                    author,
                    post: post.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ManualClock;
    use crate::model::{CommentCreate, CommentUpdate, PostCreate, UserCreate};
    use crate::store::UnitOfWork;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    /// Two users, two posts by user 1, three comments half a minute apart. The
    /// first comment is edited last.
    fn populated() -> Database {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let mut db = Database::new(Arc::new(clock.clone()));

        let mut uow = UnitOfWork::begin(&mut db);
        let kim: User = uow.insert(UserCreate::new("kim", "kim@x.com", 30)).unwrap();
        let lee: User = uow.insert(UserCreate::new("lee", "lee@x.com", 31)).unwrap();
        for title in ["one", "two"] {
            uow.insert::<Post>(PostCreate {
                author_id: kim.id,
                title: title.into(),
                content: None,
            })
            .unwrap();
        }
        uow.commit();

        for (post, user, text) in [(1, lee.id, "nice"), (2, kim.id, "thanks"), (1, kim.id, "reply")] {
            clock.advance(Duration::seconds(30));
            let mut uow = UnitOfWork::begin(&mut db);
            uow.insert::<Comment>(CommentCreate {
                post_id: PostId(post),
                user_id: user,
                content: text.into(),
            })
            .unwrap();
            uow.commit();
        }

        // Editing an old comment must not move it in created-at order.
        clock.advance(Duration::seconds(30));
        let mut uow = UnitOfWork::begin(&mut db);
        uow.update::<Comment>(CommentId(1), CommentUpdate {
            content: "very nice".into(),
        })
        .unwrap();
        uow.commit();
        db
    }

    fn texts(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|comment| comment.content.as_str()).collect()
    }

    #[test]
    fn test_lookups_by_post_and_user() {
        let db = populated();
        let repo = db.comments();
        assert_eq!(texts(&repo.find_by_post_id(PostId(1))), vec!["very nice", "reply"]);
        assert_eq!(texts(&repo.find_by_user_id(UserId(1))), vec!["thanks", "reply"]);
        assert_eq!(repo.count_by_post_id(PostId(1)), 2);
        assert_eq!(repo.count_by_user_id(UserId(2)), 1);
        assert_eq!(repo.count(), 3);
    }

    #[test]
    fn test_ordered_by_creation() {
        let db = populated();
        let ordered = db.comments().find_by_post_id_order_by_created_at_asc(PostId(1));
        assert_eq!(texts(&ordered), vec!["very nice", "reply"]);
        assert!(ordered[0].timestamps.updated_at > ordered[1].timestamps.created_at);
    }

    #[test]
    fn test_eager_fetch_with_authors() {
        let db = populated();
        let loaded = db.comments().find_with_user_and_post(PostId(1)).unwrap();
        let authors: Vec<&str> = loaded.iter().map(|c| c.author.username.as_str()).collect();
        assert_eq!(authors, vec!["lee", "kim"]);
        assert!(loaded.iter().all(|c| c.post.title == "one"));

        assert!(db.comments().find_with_user_and_post(PostId(5)).is_err());
        assert!(db.comments().find_with_user_and_post(PostId(2)).unwrap().len() == 1);
    }
}
