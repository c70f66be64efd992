//! Argument shape checks run before a request is sent to the store.

use chrono::{DateTime, Utc};

use super::error::ServiceError;
use crate::framework::{PageRequest, Sortable};

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid(format!("{field} must not be blank")));
    }
    Ok(())
}

pub(crate) fn require_email(email: &str) -> Result<(), ServiceError> {
    require_text("email", email)?;
    if !email.contains('@') {
        return Err(ServiceError::invalid(format!("not an email address: {email}")));
    }
    Ok(())
}

pub(crate) fn require_range<T: PartialOrd + std::fmt::Display>(
    what: &str,
    low: T,
    high: T,
) -> Result<(), ServiceError> {
    if low > high {
        return Err(ServiceError::invalid(format!("{what}: {low} is after {high}")));
    }
    Ok(())
}

pub(crate) fn require_period(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ServiceError> {
    require_range("period", start, end)
}

pub(crate) fn require_page<T: Sortable>(request: &PageRequest) -> Result<(), ServiceError> {
    Ok(request.validate_for::<T>()?)
}
