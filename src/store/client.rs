//! # Store Client
//!
//! The cloneable handle services use to reach the [`StoreActor`](super::StoreActor).
//! Each call ships one closure to the actor and awaits its typed result over a
//! oneshot channel. Channel failures surface as [`StoreError::ActorClosed`]
//! (request could not be sent) or [`StoreError::ActorDropped`] (no reply).

use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};

use super::actor::{Completion, StoreRequest};
use super::database::Database;
use super::unit_of_work::UnitOfWork;
use crate::framework::StoreError;

#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    /// Runs `work` against a consistent snapshot of the database. Reads can
    /// never write.
    pub async fn read<R, E, F>(&self, label: &'static str, work: F) -> Result<R, E>
    where
        F: FnOnce(&Database) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let request = StoreRequest::Read {
            label,
            work: Box::new(move |db: &Database| {
                let _ = respond_to.send(work(db));
            }),
        };
        self.send(request, response).await
    }

    /// Runs `work` as one unit of work: committed if it returns `Ok`, rolled
    /// back completely if it returns `Err`.
    pub async fn write<R, E, F>(&self, label: &'static str, work: F) -> Result<R, E>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + Display + Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let request = StoreRequest::Write {
            label,
            work: Box::new(move |uow: &mut UnitOfWork<'_>| {
                let result = work(uow);
                Completion {
                    error: result.as_ref().err().map(ToString::to_string),
                    reply: Box::new(move || {
                        let _ = respond_to.send(result);
                    }),
                }
            }),
        };
        self.send(request, response).await
    }

    async fn send<R, E>(
        &self,
        request: StoreRequest,
        response: oneshot::Receiver<Result<R, E>>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        self.sender
            .send(request)
            .await
            .map_err(|_| E::from(StoreError::ActorClosed))?;
        response.await.map_err(|_| E::from(StoreError::ActorDropped))?
    }
}
