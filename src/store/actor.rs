//! # Store Actor
//!
//! The [`StoreActor`] is the single owner of the [`Database`]. It receives
//! [`StoreRequest`]s over a bounded channel and executes them one after
//! another, so every request sees the database exactly as the previous one
//! left it and no locking is needed.
//!
//! A request is either a read, which only ever gets `&Database`, or a write,
//! which runs inside a fresh [`UnitOfWork`] that is committed when the work
//! succeeds and rolled back when it fails. The reply is sent only after the
//! commit or rollback has happened.

use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::client::StoreClient;
use super::database::Database;
use super::unit_of_work::UnitOfWork;

pub(crate) type ReadWork = Box<dyn FnOnce(&Database) + Send>;
pub(crate) type WriteWork = Box<dyn FnOnce(&mut UnitOfWork<'_>) -> Completion + Send>;

/// What a write decided, and how to deliver its result once that decision
/// has been carried out.
pub struct Completion {
    pub(crate) error: Option<String>,
    pub(crate) reply: Box<dyn FnOnce() + Send>,
}

/// One unit of work sent to the store actor.
pub enum StoreRequest {
    Read { label: &'static str, work: ReadWork },
    Write { label: &'static str, work: WriteWork },
}

impl fmt::Debug for StoreRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreRequest::Read { label, .. } => f.debug_struct("Read").field("label", label).finish(),
            StoreRequest::Write { label, .. } => f.debug_struct("Write").field("label", label).finish(),
        }
    }
}

impl StoreRequest {
    /// Name of the operation that sent this request.
    pub fn label(&self) -> &'static str {
        match self {
            StoreRequest::Read { label, .. } | StoreRequest::Write { label, .. } => label,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, StoreRequest::Write { .. })
    }

    /// Runs the request against `db` and replies to the sender.
    pub fn execute(self, db: &mut Database) {
        match self {
            StoreRequest::Read { label, work } => {
                debug!(label, "Read");
                work(&*db);
            }
            StoreRequest::Write { label, work } => {
                debug!(label, "Write");
                let mut uow = UnitOfWork::begin(db);
                let completion = work(&mut uow);
                match completion.error {
                    None => {
                        let changes = uow.commit();
                        if changes > 0 {
                            info!(label, changes, "Committed");
                        } else {
                            debug!(label, "Committed without changes");
                        }
                    }
                    Some(error) => {
                        let reverted = uow.rollback();
                        warn!(label, %error, reverted, "Rolled back");
                    }
                }
                (completion.reply)();
            }
        }
    }
}

pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    db: Database,
}

impl StoreActor {
    /// Creates the actor around `db` together with the client that talks to
    /// it. `buffer_size` bounds the request queue; senders wait when it is
    /// full.
    pub fn new(buffer_size: usize, db: Database) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, db }, StoreClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        let (users, posts, comments) = self.db.sizes();
        info!(users, posts, comments, "Store started");

        while let Some(request) = self.receiver.recv().await {
            request.execute(&mut self.db);
        }

        let (users, posts, comments) = self.db.sizes();
        info!(users, posts, comments, "Store shutdown");
    }
}
