//! Paged queries: the request a caller sends and the page it gets back.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::Sortable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Which page to fetch and how to order the full result set first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_field: String,
    pub direction: SortDirection,
}

/// Why a [`PageRequest`] was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    ZeroSize,
    UnknownSortField(String),
}

impl fmt::Display for PageRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRequestError::ZeroSize => write!(f, "page size must be greater than zero"),
            PageRequestError::UnknownSortField(field) => write!(f, "unknown sort field: {field}"),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort_field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            page,
            size,
            sort_field: sort_field.into(),
            direction,
        }
    }

    /// First `size` records ordered by id.
    pub fn first(size: u32) -> Self {
        Self::new(0, size, "id", SortDirection::Asc)
    }

    /// Shape check against the record type the page will hold.
    pub fn validate_for<T: Sortable>(&self) -> Result<(), PageRequestError> {
        if self.size == 0 {
            return Err(PageRequestError::ZeroSize);
        }
        if !T::is_sort_field(&self.sort_field) {
            return Err(PageRequestError::UnknownSortField(self.sort_field.clone()));
        }
        Ok(())
    }
}

/// One slice of an ordered result set plus the metadata to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T: Sortable> Page<T> {
    /// Sorts the full result set as requested and cuts out the requested page.
    ///
    /// The sort is stable, so rows that compare equal keep their incoming
    /// (id) order. A page past the end comes back empty with valid metadata.
    pub fn from_results(mut items: Vec<T>, request: &PageRequest) -> Self {
        let field = request.sort_field.as_str();
        items.sort_by(|a, b| {
            let ordering = a.compare_by(b, field);
            match request.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        Self::slice(items, request)
    }
}

impl<T> Page<T> {
    fn slice(items: Vec<T>, request: &PageRequest) -> Self {
        let size = request.size.max(1) as usize;
        let total = items.len();
        let total_pages = total.div_ceil(size) as u32;
        let start = (request.page as usize).saturating_mul(size);

        let content = items.into_iter().skip(start).take(size).collect();

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements: total as u64,
            total_pages,
            has_next: request.page.saturating_add(1) < total_pages,
            has_previous: request.page > 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
