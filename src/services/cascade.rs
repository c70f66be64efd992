//! Explicit cascading deletes.
//!
//! The store refuses to delete a row that is still referenced, so children go
//! first: comments, then posts, then the user. Both helpers run inside the
//! caller's unit of work; if any step fails the whole unit rolls back.

use crate::framework::StoreError;
use crate::model::{Comment, Post, PostId, User, UserId};
use crate::store::UnitOfWork;

/// What a cascading delete removed besides the row it was asked to delete.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub posts: usize,
    pub comments: usize,
}

/// Deletes a post and its comments.
pub(crate) fn delete_post(uow: &mut UnitOfWork<'_>, id: PostId) -> Result<Removed, StoreError> {
    uow.db().posts().get(id)?;

    let comments = uow.db().comments().find_by_post_id(id);
    for comment in &comments {
        uow.delete::<Comment>(comment.id)?;
    }
    uow.delete::<Post>(id)?;

    Ok(Removed {
        posts: 0,
        comments: comments.len(),
    })
}

/// Deletes a user, every comment they wrote on any post, and every post they
/// authored together with its comments.
pub(crate) fn delete_user(uow: &mut UnitOfWork<'_>, id: UserId) -> Result<Removed, StoreError> {
    uow.db().users().get(id)?;
    let mut removed = Removed::default();

    let own_comments = uow.db().comments().find_by_user_id(id);
    for comment in &own_comments {
        uow.delete::<Comment>(comment.id)?;
    }
    removed.comments += own_comments.len();

    let posts = uow.db().posts().find_by_author_id(id);
    for post in &posts {
        removed.comments += delete_post(uow, post.id)?.comments;
    }
    removed.posts = posts.len();

    uow.delete::<User>(id)?;
    Ok(removed)
}
