//! # Entity Contract
//!
//! Every record kind kept by the store implements [`Entity`]. The store is
//! written once against this trait and reused for users, posts and comments.
//!
//! Associated types keep each table type-safe: a `Table<Post>` only accepts a
//! `PostCreate` payload, a `PostUpdate` and a `PostAction`. Sending a user
//! payload to the post table does not compile.
//!
//! ## Lifecycle
//!
//! - [`Entity::from_create_params`] builds the full record from its id, the
//!   creation payload and the insert timestamp. There is no partially
//!   initialised record.
//! - [`Entity::on_update`] applies an update payload.
//! - [`Entity::handle_action`] applies a domain transition (publish, ban, ...).
//! - [`Entity::validate`] runs on every insert and update and reports
//!   not-null / length problems as constraint violations.
//! - [`Entity::unique_keys`] lists the values that must be unique across the
//!   table (backed by an index in [`Table`](super::Table)).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use super::error::StoreError;

/// Audit timestamps carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

/// A value that must be unique across one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueKey {
    pub constraint: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(constraint: &'static str, value: impl Into<String>) -> Self {
        Self {
            constraint,
            value: value.into(),
        }
    }
}

/// Trait that any record kind must implement to be kept in a [`Table`](super::Table).
pub trait Entity: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Surrogate key. Built from the table's sequence.
    type Id: Copy + Ord + Hash + Display + Debug + Send + Sync + From<u64>;

    /// Payload required to create a record.
    type Create: Debug + Send;

    /// Payload describing a field update.
    type Update: Debug + Send;

    /// Domain-specific transitions beyond plain field updates.
    type Action: Debug + Send;

    /// What an action reports back.
    type ActionResult: Debug + Send;

    /// Name used in errors and logs.
    const NAME: &'static str;

    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError>;

    fn on_update(&mut self, update: Self::Update) -> Result<(), StoreError>;

    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, StoreError>;

    fn id(&self) -> Self::Id;

    fn timestamps(&self) -> &Timestamps;

    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Column-level checks (not null, length). Default: none.
    fn validate(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Values that must be unique across the table. Default: none.
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }
}

/// Records that can be ordered by a named field for paged queries.
pub trait Sortable {
    /// Accepted sort keys, camelCase and snake_case.
    const SORT_FIELDS: &'static [&'static str];

    /// Compares two records by `field`. Only called with a member of
    /// [`Sortable::SORT_FIELDS`]; unknown keys compare equal.
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;

    fn is_sort_field(field: &str) -> bool {
        Self::SORT_FIELDS.contains(&field)
    }
}

/// Checks that a required text column is present and fits its length.
pub(crate) fn check_text(
    entity: &'static str,
    column: &'static str,
    value: &str,
    max_len: Option<usize>,
) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::constraint(
            entity,
            "not_null",
            format!("{column} is required"),
        ));
    }
    check_length(entity, column, value, max_len)
}

pub(crate) fn check_length(
    entity: &'static str,
    column: &'static str,
    value: &str,
    max_len: Option<usize>,
) -> Result<(), StoreError> {
    match max_len {
        Some(max) if value.chars().count() > max => Err(StoreError::constraint(
            entity,
            "length",
            format!("{column} exceeds {max} characters"),
        )),
        _ => Ok(()),
    }
}
