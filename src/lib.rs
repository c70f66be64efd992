#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Blog Store
//!
//! > **Users, posts and comments in an actor-owned, transactional store.**
//!
//! The crate keeps three related record kinds in memory and exposes them
//! through typed repositories and domain services. All state lives in one
//! [`Database`](store::Database) owned by a single [`StoreActor`](store::StoreActor);
//! every service call is one request to that actor, so every call is atomic.
//!
//! ## 🏗️ Relationship Model
//!
//! - A **User** owns its **Posts**: deleting the user deletes them.
//! - A **Post** always has an author and owns its **Comments**.
//! - A **Comment** belongs to one post and names one user as its author.
//! - Emails are unique across users, backed by a unique index.
//!
//! Cascades are explicit code in [`services::cascade`]. The store itself
//! refuses to delete a row that is still referenced, so a cascade that forgets
//! a step fails and rolls back instead of leaving dangling ids.
//!
//! ## 🚀 Core Concepts
//!
//! ### Reads and writes
//! A read is a closure over `&Database` and cannot mutate anything. A write is
//! a closure over a [`UnitOfWork`](store::UnitOfWork): its changes are
//! journalled, committed when the closure returns `Ok` and rolled back when it
//! returns `Err`. Inside a write, reads see the write's own earlier changes.
//!
//! ### Timestamps
//! Each unit of work gets one timestamp from a pluggable
//! [`Clock`](framework::Clock), strictly greater than the previous one. An
//! update that changes nothing is not written and keeps its `updated_at`.
//!
//! ### Mocking
//! [`store::mock`] hands out a client whose requests land in a test-owned
//! channel, so services can be tested without a running store.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`] - entity contract, tables, paging, clock and store errors.
//! - [`store`] - database, unit of work, the actor and its client.
//! - [`model`] - records, ids, payloads and eager-fetch projections.
//! - [`users`], [`posts`], [`comments`] - entity rules and repositories.
//! - [`services`] - the public operation set and [`ServiceError`](services::ServiceError).
//! - [`lifecycle`] - [`BlogSystem`](lifecycle::BlogSystem) and tracing setup.
//! - [`config`] - TOML configuration.
//! - [`seed`] - demo fixtures.
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod comments;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod posts;
pub mod seed;
pub mod services;
pub mod store;
pub mod users;

pub use lifecycle::BlogSystem;
pub use services::{CommentService, PostService, ServiceError, UserService};
