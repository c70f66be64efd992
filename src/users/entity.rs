//! Entity trait implementation for the User domain type.
//!
//! Column rules: `username` (required, ≤ 50 chars), `email` (required,
//! ≤ 100 chars, unique across all users, compared exactly), `phone_number`
//! (optional, ≤ 20 chars).

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::framework::entity::{check_length, check_text};
use crate::framework::{Entity, Sortable, StoreError, Timestamps, UniqueKey, USERS_EMAIL_UNIQUE};
use crate::model::{User, UserAction, UserCreate, UserId, UserStatus, UserUpdate};

impl Entity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = UserStatus;

    const NAME: &'static str = "User";

    /// New users start out `ACTIVE`.
    fn from_create_params(id: UserId, params: UserCreate, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            username: params.username,
            email: params.email,
            phone_number: params.phone_number,
            age: params.age,
            status: UserStatus::default(),
            timestamps: Timestamps::new(now),
        })
    }

    fn on_update(&mut self, update: UserUpdate) -> Result<(), StoreError> {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone_number) = update.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<UserStatus, StoreError> {
        match action {
            UserAction::SetStatus(status) => Ok(std::mem::replace(&mut self.status, status)),
        }
    }

    fn id(&self) -> UserId {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn validate(&self) -> Result<(), StoreError> {
        check_text(Self::NAME, "username", &self.username, Some(50))?;
        check_text(Self::NAME, "email", &self.email, Some(100))?;
        if let Some(phone) = &self.phone_number {
            check_length(Self::NAME, "phone_number", phone, Some(20))?;
        }
        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new(USERS_EMAIL_UNIQUE, self.email.clone())]
    }
}

impl Sortable for User {
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "email",
        "age",
        "status",
        "createdAt",
        "created_at",
        "updatedAt",
        "updated_at",
    ];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "id" => self.id.cmp(&other.id),
            "username" => self.username.cmp(&other.username),
            "email" => self.email.cmp(&other.email),
            "age" => self.age.cmp(&other.age),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "createdAt" | "created_at" => self.timestamps.created_at.cmp(&other.timestamps.created_at),
            "updatedAt" | "updated_at" => self.timestamps.updated_at.cmp(&other.timestamps.updated_at),
            _ => Ordering::Equal,
        }
    }
}
