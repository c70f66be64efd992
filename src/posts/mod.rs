//! Posts: entity rules, view-count and publish actions, and the post
//! repository.

pub mod entity;
pub mod repository;

pub use repository::PostRepository;
