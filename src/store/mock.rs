//! # Mock Store
//!
//! Helpers for testing services without a running [`StoreActor`](super::StoreActor).
//!
//! [`create_mock_client`] returns a real [`StoreClient`] wired to a receiver the
//! test holds. The test then decides what happens to each request:
//!
//! - execute it against a database of its choosing (`request.execute(&mut db)`),
//! - drop it, which the caller sees as [`StoreError::ActorDropped`](crate::framework::StoreError::ActorDropped),
//! - or drop the receiver, which makes every later call fail with
//!   [`StoreError::ActorClosed`](crate::framework::StoreError::ActorClosed).
//!
//! ```rust,ignore
//! let (client, mut receiver) = create_mock_client(4);
//! let service = UserService::new(client);
//!
//! let call = tokio::spawn(async move { service.get_user(UserId(1)).await });
//! let request = expect_request(&mut receiver).await.unwrap();
//! assert_eq!(request.label(), "get_user");
//! drop(request);
//!
//! assert!(matches!(call.await.unwrap(), Err(ServiceError::ActorCommunicationError(_))));
//! ```

use tokio::sync::mpsc;

use super::actor::StoreRequest;
use super::client::StoreClient;

pub fn create_mock_client(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Waits for the next request. `None` once every client is gone.
pub async fn expect_request(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<StoreRequest> {
    receiver.recv().await
}

/// Waits for the next request and checks it came from `label`.
pub async fn expect_labelled(
    receiver: &mut mpsc::Receiver<StoreRequest>,
    label: &str,
) -> Option<StoreRequest> {
    match receiver.recv().await {
        Some(request) if request.label() == label => Some(request),
        _ => None,
    }
}
