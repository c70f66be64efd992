//! Storage-engine-agnostic building blocks.
//!
//! # Main Components
//!
//! - [`Entity`] - Trait that record kinds implement to be kept in a table
//! - [`Table`] - Rows of one kind, with id sequence, unique index and timestamps
//! - [`Page`] / [`PageRequest`] - Paged, sorted query results
//! - [`Clock`] - Time source for audit timestamps
//! - [`StoreError`] - Errors raised by the storage layer

pub mod clock;
pub mod entity;
pub mod error;
pub mod page;
pub mod table;

pub use clock::*;
pub use entity::{Entity, Sortable, Timestamps, UniqueKey};
pub use error::*;
pub use page::*;
pub use table::*;
