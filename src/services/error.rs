//! Error type returned by every service operation.

use thiserror::Error;

use crate::framework::{PageRequestError, StoreError, USERS_EMAIL_UNIQUE};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Another user already has this email.
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    /// The store refused the write (missing value, length, foreign key, ...).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The arguments were rejected before the store was touched.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the store actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::ValidationError(message.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            StoreError::ConstraintViolation {
                constraint, detail, ..
            } if constraint == USERS_EMAIL_UNIQUE => ServiceError::DuplicateEmail(detail),
            e @ StoreError::ConstraintViolation { .. } => ServiceError::ConstraintViolation(e.to_string()),
            e @ (StoreError::ActorClosed | StoreError::ActorDropped) => {
                ServiceError::ActorCommunicationError(e.to_string())
            }
        }
    }
}

impl From<PageRequestError> for ServiceError {
    fn from(error: PageRequestError) -> Self {
        ServiceError::ValidationError(error.to_string())
    }
}
