//! Users: entity rules and the user repository.

pub mod entity;
pub mod repository;

pub use repository::UserRepository;
