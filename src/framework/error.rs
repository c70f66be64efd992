//! Errors raised by the storage layer itself.

use thiserror::Error;

/// Name of the unique index guarding `users.email`.
pub const USERS_EMAIL_UNIQUE: &str = "users_email_unique";

/// Errors that can occur inside the entity store or while talking to it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A storage-level constraint (not null, length, unique, foreign key,
    /// delete restriction) rejected the write.
    #[error("{entity} violates {constraint}: {detail}")]
    ConstraintViolation {
        entity: &'static str,
        constraint: &'static str,
        detail: String,
    },

    #[error("Store actor closed")]
    ActorClosed,

    #[error("Store actor dropped response channel")]
    ActorDropped,
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn constraint(
        entity: &'static str,
        constraint: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        StoreError::ConstraintViolation {
            entity,
            constraint,
            detail: detail.into(),
        }
    }

    /// True when this is a violation of the named constraint.
    pub fn is_constraint(&self, name: &str) -> bool {
        matches!(self, StoreError::ConstraintViolation { constraint, .. } if *constraint == name)
    }
}
