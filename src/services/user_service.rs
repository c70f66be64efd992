//! # User Service
//!
//! Account operations. Each public method is one request to the store, so a
//! call either applies completely (including cascades) or not at all.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use super::cascade;
use super::error::ServiceError;
use super::validation::{require_email, require_page, require_range, require_text};
use crate::framework::{Page, PageRequest};
use crate::model::{PostId, User, UserAction, UserCreate, UserId, UserStatus, UserSummary, UserUpdate, UserWithPosts};
use crate::store::StoreClient;

#[derive(Clone)]
pub struct UserService {
    store: StoreClient,
}

impl UserService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Registers a user. Fails with `DuplicateEmail` if the email is taken.
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, ServiceError> {
        require_text("username", &params.username)?;
        require_email(&params.email)?;

        let user = self
            .store
            .write("create_user", move |uow| -> Result<User, ServiceError> {
                if uow.db().users().exists_by_email(&params.email) {
                    return Err(ServiceError::DuplicateEmail(params.email));
                }
                Ok(uow.insert::<User>(params)?)
            })
            .await?;
        info!(%user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.store
            .read("get_user", move |db| -> Result<_, ServiceError> { Ok(db.users().get(id)?) })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: String) -> Result<User, ServiceError> {
        self.store
            .read("get_user_by_email", move |db| {
                db.users()
                    .find_by_email(&email)
                    .ok_or_else(|| ServiceError::not_found("User", email))
            })
            .await
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, ServiceError> {
        self.store
            .read("get_all_users", |db| Ok(db.users().find_all()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_users_by_username(&self, keyword: String) -> Result<Vec<User>, ServiceError> {
        self.store
            .read("search_users_by_username", move |db| {
                Ok(db.users().find_by_username_containing(&keyword))
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn search_users_by_username_paged(
        &self,
        keyword: String,
        request: PageRequest,
    ) -> Result<Page<User>, ServiceError> {
        require_page::<User>(&request)?;
        self.store
            .read("search_users_by_username_paged", move |db| {
                Ok(db.users().find_by_username_containing_paged(&keyword, &request))
            })
            .await
    }

    /// Replaces the username and phone number. `None` clears the phone.
    #[instrument(skip(self))]
    pub async fn update_user(
        &self,
        id: UserId,
        username: String,
        phone_number: Option<String>,
    ) -> Result<User, ServiceError> {
        require_text("username", &username)?;
        let update = UserUpdate {
            username: Some(username),
            phone_number: Some(phone_number),
            ..Default::default()
        };
        self.store
            .write("update_user", move |uow| -> Result<_, ServiceError> {
                Ok(uow.update::<User>(id, update)?)
            })
            .await
    }

    /// Changes the email. Keeping the current email is allowed; taking one
    /// another user has fails with `DuplicateEmail`.
    #[instrument(skip(self))]
    pub async fn update_email(&self, id: UserId, new_email: String) -> Result<User, ServiceError> {
        require_email(&new_email)?;
        self.store
            .write("update_email", move |uow| -> Result<User, ServiceError> {
                let users = uow.db().users();
                users.get(id)?;
                if users.find_by_email(&new_email).is_some_and(|owner| owner.id != id) {
                    return Err(ServiceError::DuplicateEmail(new_email));
                }
                let update = UserUpdate {
                    email: Some(new_email),
                    ..Default::default()
                };
                Ok(uow.update::<User>(id, update)?)
            })
            .await
    }

    /// Sets any status from any other.
    #[instrument(skip(self))]
    pub async fn update_user_status(&self, id: UserId, status: UserStatus) -> Result<User, ServiceError> {
        let (user, previous) = self
            .store
            .write("update_user_status", move |uow| -> Result<_, ServiceError> {
                Ok(uow.perform_action::<User>(id, UserAction::SetStatus(status))?)
            })
            .await?;
        debug!(%id, %previous, %status, "Status set");
        Ok(user)
    }

    pub async fn activate_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.update_user_status(id, UserStatus::Active).await
    }

    pub async fn deactivate_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.update_user_status(id, UserStatus::Inactive).await
    }

    pub async fn ban_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.update_user_status(id, UserStatus::Banned).await
    }

    /// Deletes the user, their posts, the comments on those posts and every
    /// comment the user wrote elsewhere.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ServiceError> {
        let removed = self
            .store
            .write("delete_user", move |uow| -> Result<_, ServiceError> {
                Ok(cascade::delete_user(uow, id)?)
            })
            .await?;
        info!(%id, posts = removed.posts, comments = removed.comments, "User deleted");
        Ok(())
    }

    /// Detaches a post from its author, which deletes it and its comments.
    /// Fails with `ValidationError` if the post belongs to another user.
    #[instrument(skip(self))]
    pub async fn remove_post_from_user(&self, user_id: UserId, post_id: PostId) -> Result<(), ServiceError> {
        let removed = self
            .store
            .write("remove_post_from_user", move |uow| -> Result<_, ServiceError> {
                uow.db().users().get(user_id)?;
                let post = uow.db().posts().get(post_id)?;
                if post.author_id != user_id {
                    return Err(ServiceError::invalid(format!(
                        "{post_id} belongs to {}, not {user_id}",
                        post.author_id
                    )));
                }
                Ok(cascade::delete_post(uow, post_id)?)
            })
            .await?;
        info!(%user_id, %post_id, comments = removed.comments, "Post removed from user");
        Ok(())
    }

    /// Deletes every user with `status`, with the same cascade as
    /// [`UserService::delete_user`]. Returns how many users went.
    #[instrument(skip(self))]
    pub async fn delete_users_by_status(&self, status: UserStatus) -> Result<usize, ServiceError> {
        let deleted = self
            .store
            .write("delete_users_by_status", move |uow| -> Result<usize, ServiceError> {
                let doomed = uow.db().users().find_by_status(status);
                for user in &doomed {
                    cascade::delete_user(uow, user.id)?;
                }
                Ok(doomed.len())
            })
            .await?;
        info!(%status, deleted, "Users deleted");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn get_users_by_status(&self, status: UserStatus) -> Result<Vec<User>, ServiceError> {
        self.store
            .read("get_users_by_status", move |db| Ok(db.users().find_by_status(status)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_by_status_paged(
        &self,
        status: UserStatus,
        request: PageRequest,
    ) -> Result<Page<User>, ServiceError> {
        require_page::<User>(&request)?;
        self.store
            .read("get_users_by_status_paged", move |db| {
                Ok(db.users().find_by_status_paged(status, &request))
            })
            .await
    }

    pub async fn get_active_users(&self) -> Result<Vec<User>, ServiceError> {
        self.get_users_by_status(UserStatus::Active).await
    }

    /// Inclusive on both ends.
    #[instrument(skip(self))]
    pub async fn get_users_by_age_range(&self, min_age: u32, max_age: u32) -> Result<Vec<User>, ServiceError> {
        require_range("age range", min_age, max_age)?;
        self.store
            .read("get_users_by_age_range", move |db| {
                Ok(db.users().find_by_age_between(min_age, max_age))
            })
            .await
    }

    /// Newest first.
    pub async fn get_recent_users(&self) -> Result<Vec<User>, ServiceError> {
        self.store
            .read("get_recent_users", |db| Ok(db.users().find_all_order_by_created_at_desc()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_joined_after(&self, instant: DateTime<Utc>) -> Result<Vec<User>, ServiceError> {
        self.store
            .read("get_users_joined_after", move |db| {
                Ok(db.users().find_by_created_at_after(instant))
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_user_with_posts(&self, id: UserId) -> Result<UserWithPosts, ServiceError> {
        self.store
            .read("get_user_with_posts", move |db| -> Result<_, ServiceError> {
                Ok(db.users().find_with_posts(id)?)
            })
            .await
    }

    pub async fn get_user_count(&self) -> Result<usize, ServiceError> {
        self.store
            .read("get_user_count", |db| Ok(db.users().count()))
            .await
    }

    pub async fn get_user_count_by_status(&self, status: UserStatus) -> Result<usize, ServiceError> {
        self.store
            .read("get_user_count_by_status", move |db| Ok(db.users().count_by_status(status)))
            .await
    }

    pub async fn get_active_user_count(&self) -> Result<usize, ServiceError> {
        self.get_user_count_by_status(UserStatus::Active).await
    }

    pub async fn count_users_by_status(&self) -> Result<BTreeMap<UserStatus, usize>, ServiceError> {
        self.store
            .read("count_users_by_status", |db| Ok(db.users().count_users_by_status()))
            .await
    }

    pub async fn get_user_summaries(&self) -> Result<Vec<UserSummary>, ServiceError> {
        self.store
            .read("get_user_summaries", |db| Ok(db.users().find_user_summaries()))
            .await
    }
}
