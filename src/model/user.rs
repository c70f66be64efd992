use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::framework::Timestamps;
use crate::model::Post;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// Account standing. Any status can be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Banned,
}

impl UserStatus {
    /// The stored name. Sorting by status orders by this name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Banned => "BANNED",
        }
    }
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a registered user.
///
/// A user exclusively owns its posts: deleting the user deletes them.
/// The `Entity` implementation lives in [`crate::users::entity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub age: u32,
    pub status: UserStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub age: u32,
}

impl UserCreate {
    pub fn new(username: impl Into<String>, email: impl Into<String>, age: u32) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            phone_number: None,
            age,
        }
    }

    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }
}

/// Payload for updating an existing user. `None` leaves a field untouched;
/// `phone_number: Some(None)` clears the phone number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub age: Option<u32>,
}

/// Custom actions for User entities.
#[derive(Debug, Clone, Copy)]
pub enum UserAction {
    /// Sets the status unconditionally; reports the previous one.
    SetStatus(UserStatus),
}

/// Id, username and email only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// A user fetched together with all of its posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithPosts {
    pub user: User,
    pub posts: Vec<Post>,
}
