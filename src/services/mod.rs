//! # Domain Services
//!
//! The public operation set. Services own no state: each holds a
//! [`StoreClient`](crate::store::StoreClient) and turns every call into one
//! read or one write request, which makes the call atomic.
//!
//! Arguments are shape-checked before anything is sent, and every error
//! reaches the caller as a [`ServiceError`].

pub mod cascade;
pub mod comment_service;
pub mod error;
pub mod post_service;
pub mod user_service;
mod validation;

pub use cascade::Removed;
pub use comment_service::CommentService;
pub use error::ServiceError;
pub use post_service::PostService;
pub use user_service::UserService;
