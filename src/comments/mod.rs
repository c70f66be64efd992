pub mod entity;
pub mod repository;

pub use repository::CommentRepository;
