//! # Database
//!
//! The three tables plus the rules that span them: foreign keys and delete
//! restrictions. The database never cascades on its own; a row that is still
//! referenced cannot be deleted, so cascades have to be spelled out by the
//! caller (see the services).

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::framework::{Clock, Entity, MonotonicStamp, StoreError, SystemClock, Table};
use crate::model::{Comment, Post, User};

pub const POSTS_AUTHOR_FK: &str = "posts_author_fk";
pub const COMMENTS_POST_FK: &str = "comments_post_fk";
pub const COMMENTS_USER_FK: &str = "comments_user_fk";

pub struct Database {
    users: Table<User>,
    posts: Table<Post>,
    comments: Table<Comment>,
    stamps: MonotonicStamp,
}

impl Default for Database {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Database {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Table::new(),
            posts: Table::new(),
            comments: Table::new(),
            stamps: MonotonicStamp::new(clock),
        }
    }

    /// The table holding records of kind `T`.
    pub fn table<T: Stored>(&self) -> &Table<T> {
        T::table(self)
    }

    pub(crate) fn table_mut<T: Stored>(&mut self) -> &mut Table<T> {
        T::table_mut(self)
    }

    /// Row counts as (users, posts, comments).
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.users.len(), self.posts.len(), self.comments.len())
    }

    pub(crate) fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.stamps.next()
    }
}

/// A single journalled change to one table.
#[derive(Debug)]
pub enum Change<T: Entity> {
    Inserted(T::Id),
    Updated(T),
    Deleted(T),
}

impl<T: Stored> Change<T> {
    fn revert(self, db: &mut Database) {
        let table = db.table_mut::<T>();
        match self {
            Change::Inserted(id) => table.discard(id),
            Change::Updated(previous) | Change::Deleted(previous) => table.restore(previous),
        }
    }
}

/// A journal entry of any table.
#[derive(Debug)]
pub enum Undo {
    User(Change<User>),
    Post(Change<Post>),
    Comment(Change<Comment>),
}

impl Undo {
    pub(crate) fn revert(self, db: &mut Database) {
        match self {
            Undo::User(change) => change.revert(db),
            Undo::Post(change) => change.revert(db),
            Undo::Comment(change) => change.revert(db),
        }
    }
}

/// Binds a record kind to its table and states its cross-table rules.
pub trait Stored: Entity {
    fn table(db: &Database) -> &Table<Self>;

    fn table_mut(db: &mut Database) -> &mut Table<Self>;

    fn journal(change: Change<Self>) -> Undo;

    /// Every row this one points at must exist.
    fn check_references(&self, _db: &Database) -> Result<(), StoreError> {
        Ok(())
    }

    /// No other row may point at `id` when it is deleted.
    fn check_unreferenced(_id: Self::Id, _db: &Database) -> Result<(), StoreError> {
        Ok(())
    }
}

impl Stored for User {
    fn table(db: &Database) -> &Table<Self> {
        &db.users
    }

    fn table_mut(db: &mut Database) -> &mut Table<Self> {
        &mut db.users
    }

    fn journal(change: Change<Self>) -> Undo {
        Undo::User(change)
    }

    fn check_unreferenced(id: Self::Id, db: &Database) -> Result<(), StoreError> {
        if let Some(post) = db.posts.iter().find(|post| post.author_id == id) {
            return Err(StoreError::constraint(
                Self::NAME,
                POSTS_AUTHOR_FK,
                format!("{id} still authors {}", post.id),
            ));
        }
        if let Some(comment) = db.comments.iter().find(|comment| comment.user_id == id) {
            return Err(StoreError::constraint(
                Self::NAME,
                COMMENTS_USER_FK,
                format!("{id} still authors {}", comment.id),
            ));
        }
        Ok(())
    }
}

impl Stored for Post {
    fn table(db: &Database) -> &Table<Self> {
        &db.posts
    }

    fn table_mut(db: &mut Database) -> &mut Table<Self> {
        &mut db.posts
    }

    fn journal(change: Change<Self>) -> Undo {
        Undo::Post(change)
    }

    fn check_references(&self, db: &Database) -> Result<(), StoreError> {
        if !db.users.contains(self.author_id) {
            return Err(StoreError::constraint(
                Self::NAME,
                POSTS_AUTHOR_FK,
                format!("author {} does not exist", self.author_id),
            ));
        }
        Ok(())
    }

    fn check_unreferenced(id: Self::Id, db: &Database) -> Result<(), StoreError> {
        match db.comments.iter().find(|comment| comment.post_id == id) {
            Some(comment) => Err(StoreError::constraint(
                Self::NAME,
                COMMENTS_POST_FK,
                format!("{id} still has {}", comment.id),
            )),
            None => Ok(()),
        }
    }
}

impl Stored for Comment {
    fn table(db: &Database) -> &Table<Self> {
        &db.comments
    }

    fn table_mut(db: &mut Database) -> &mut Table<Self> {
        &mut db.comments
    }

    fn journal(change: Change<Self>) -> Undo {
        Undo::Comment(change)
    }

    fn check_references(&self, db: &Database) -> Result<(), StoreError> {
        if !db.posts.contains(self.post_id) {
            return Err(StoreError::constraint(
                Self::NAME,
                COMMENTS_POST_FK,
                format!("post {} does not exist", self.post_id),
            ));
        }
        if !db.users.contains(self.user_id) {
            return Err(StoreError::constraint(
                Self::NAME,
                COMMENTS_USER_FK,
                format!("user {} does not exist", self.user_id),
            ));
        }
        Ok(())
    }
}
