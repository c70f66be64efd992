use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::StoreConfig;
use crate::framework::Clock;
use crate::services::{CommentService, PostService, UserService};
use crate::store::{Database, StoreActor};

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("Store task failed: {0}")]
    StoreTaskFailed(#[from] tokio::task::JoinError),
}

/// The running store and the services wired to it.
///
/// ```ignore
/// let system = BlogSystem::new(&StoreConfig::default());
///
/// let user = system.users.create_user(UserCreate::new("kim", "kim@x.com", 30)).await?;
/// let post = system.posts.create_post(user.id, "Hello".into(), None).await?;
///
/// system.shutdown().await?;
/// ```
///
/// Must be created inside a tokio runtime.
pub struct BlogSystem {
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    handle: JoinHandle<()>,
}

impl BlogSystem {
    /// Starts an empty store stamped by the system clock.
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_database(config, Database::default())
    }

    /// Starts an empty store stamped by `clock`.
    pub fn with_clock(config: &StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_database(config, Database::new(clock))
    }

    pub fn with_database(config: &StoreConfig, db: Database) -> Self {
        let (actor, client) = StoreActor::new(config.channel_capacity, db);
        let handle = tokio::spawn(actor.run());

        Self {
            users: UserService::new(client.clone()),
            posts: PostService::new(client.clone()),
            comments: CommentService::new(client),
            handle,
        }
    }

    /// Closes the store once every outstanding request has been served.
    ///
    /// Clones of the services handed out earlier keep the store alive; this
    /// waits until they are gone too.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down store");
        drop(self.users);
        drop(self.posts);
        drop(self.comments);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Store task failed");
            return Err(e.into());
        }
        info!("Shutdown complete");
        Ok(())
    }
}
