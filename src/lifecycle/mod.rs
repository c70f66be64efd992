//! # System Lifecycle
//!
//! Starting, wiring and stopping the store.
//!
//! [`BlogSystem::new`] creates the [`StoreActor`](crate::store::StoreActor)
//! and its client, spawns the actor on the tokio runtime and hands one clone
//! of the client to each service. There is a single actor, so there is no
//! wiring order to get wrong.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the services** - their clients are the only senders.
//! 2. **Actor sees the closed channel** - `recv()` returns `None` after the
//!    queued requests are served.
//! 3. **Actor logs its final table sizes** and returns.
//! 4. **Await the task** - a panic inside the actor surfaces as
//!    [`ShutdownError`].

pub mod blog_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use blog_system::{BlogSystem, ShutdownError};
