//! The concrete entity store: three tables behind one actor.

pub mod actor;
pub mod client;
pub mod database;
pub mod mock;
pub mod unit_of_work;

pub use actor::{StoreActor, StoreRequest};
pub use client::StoreClient;
pub use database::{Change, Database, Stored, Undo, COMMENTS_POST_FK, COMMENTS_USER_FK, POSTS_AUTHOR_FK};
pub use unit_of_work::UnitOfWork;
