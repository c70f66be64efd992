//! Typed queries over the users table.
//!
//! Text search is case-sensitive substring matching. Unless a method says
//! otherwise, results come back in ascending id order.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::framework::{Page, PageRequest, Sortable, StoreError, Table, UniqueKey, USERS_EMAIL_UNIQUE};
use crate::model::{Post, User, UserId, UserStatus, UserSummary, UserWithPosts};
use crate::store::Database;

impl Database {
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository { db: self }
    }
}

#[derive(Clone, Copy)]
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    fn table(&self) -> &'a Table<User> {
        self.db.table::<User>()
    }

    fn filter(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        self.table().iter().filter(|user| predicate(user)).cloned().collect()
    }

    fn sorted_by(mut users: Vec<User>, field: &str, descending: bool) -> Vec<User> {
        users.sort_by(|a, b| {
            let ordering = a.compare_by(b, field);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        users
    }

    pub fn get(&self, id: UserId) -> Result<User, StoreError> {
        self.table().get(id).cloned()
    }

    pub fn find_by_id(&self, id: UserId) -> Option<User> {
        self.table().find(id).cloned()
    }

    pub fn find_all(&self) -> Vec<User> {
        self.table().iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.table().len()
    }

    /// Exact match through the unique index.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.table()
            .lookup_unique(&UniqueKey::new(USERS_EMAIL_UNIQUE, email))
            .and_then(|id| self.find_by_id(id))
    }

    pub fn find_by_username_and_email(&self, username: &str, email: &str) -> Option<User> {
        self.find_by_email(email).filter(|user| user.username == username)
    }

    pub fn find_by_username_containing(&self, keyword: &str) -> Vec<User> {
        self.filter(|user| user.username.contains(keyword))
    }

    pub fn find_by_username_containing_paged(&self, keyword: &str, request: &PageRequest) -> Page<User> {
        Page::from_results(self.find_by_username_containing(keyword), request)
    }

    pub fn exists_by_username(&self, username: &str) -> bool {
        self.table().iter().any(|user| user.username == username)
    }

    pub fn exists_by_email(&self, email: &str) -> bool {
        self.table()
            .lookup_unique(&UniqueKey::new(USERS_EMAIL_UNIQUE, email))
            .is_some()
    }

    /// Inclusive on both ends.
    pub fn find_by_age_between(&self, min: u32, max: u32) -> Vec<User> {
        self.filter(|user| (min..=max).contains(&user.age))
    }

    pub fn find_by_age_greater_than(&self, age: u32) -> Vec<User> {
        self.filter(|user| user.age > age)
    }

    pub fn find_by_age_less_than(&self, age: u32) -> Vec<User> {
        self.filter(|user| user.age < age)
    }

    pub fn find_by_status(&self, status: UserStatus) -> Vec<User> {
        self.filter(|user| user.status == status)
    }

    pub fn find_by_status_paged(&self, status: UserStatus, request: &PageRequest) -> Page<User> {
        Page::from_results(self.find_by_status(status), request)
    }

    pub fn find_by_status_not(&self, status: UserStatus) -> Vec<User> {
        self.filter(|user| user.status != status)
    }

    pub fn count_by_status(&self, status: UserStatus) -> usize {
        self.table().iter().filter(|user| user.status == status).count()
    }

    pub fn find_by_created_at_after(&self, instant: DateTime<Utc>) -> Vec<User> {
        self.filter(|user| user.timestamps.created_at > instant)
    }

    pub fn find_by_created_at_before(&self, instant: DateTime<Utc>) -> Vec<User> {
        self.filter(|user| user.timestamps.created_at < instant)
    }

    /// Inclusive on both ends.
    pub fn find_by_created_at_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<User> {
        self.filter(|user| (start..=end).contains(&user.timestamps.created_at))
    }

    pub fn find_all_order_by_username_desc(&self) -> Vec<User> {
        Self::sorted_by(self.find_all(), "username", true)
    }

    pub fn find_all_order_by_created_at_desc(&self) -> Vec<User> {
        Self::sorted_by(self.find_all(), "createdAt", true)
    }

    pub fn find_by_status_order_by_created_at_desc(&self, status: UserStatus) -> Vec<User> {
        Self::sorted_by(self.find_by_status(status), "createdAt", true)
    }

    /// Users with the given status aged `min_age` or more.
    pub fn find_active_users_older_than(&self, min_age: u32, status: UserStatus) -> Vec<User> {
        self.filter(|user| user.age >= min_age && user.status == status)
    }

    /// The user and all of its posts, in one lookup.
    pub fn find_with_posts(&self, id: UserId) -> Result<UserWithPosts, StoreError> {
        let user = self.get(id)?;
        let posts = self
            .db
            .table::<Post>()
            .iter()
            .filter(|post| post.author_id == id)
            .cloned()
            .collect();
        Ok(UserWithPosts { user, posts })
    }

    /// Number of users per age, ascending by age.
    pub fn count_users_by_age(&self) -> Vec<(u32, usize)> {
        let mut counts = BTreeMap::new();
        for user in self.table().iter() {
            *counts.entry(user.age).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Number of users per status. Statuses nobody has are left out.
    pub fn count_users_by_status(&self) -> BTreeMap<UserStatus, usize> {
        let mut counts = BTreeMap::new();
        for user in self.table().iter() {
            *counts.entry(user.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn find_user_summaries(&self) -> Vec<UserSummary> {
        self.table().iter().map(UserSummary::from).collect()
    }
}
