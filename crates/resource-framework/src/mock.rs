//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from a
//! queue of expectations instead of an actor. Use it to unit-test logic built *around* a
//! client (controllers, services) without spawning actors or seeding rows.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **State** | No real state (expectations) | Real rows and transactions |
//! | **Use Case** | Logic around the client | The actor itself or the full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires a failing storage) |
//!
//! ```rust,ignore
//! let mut mock = MockClient::<Post>::new();
//! mock.expect_find(PostId(1)).return_ok(Some(post));
//! mock.expect_modify(PostId(1)).return_err(FrameworkError::ActorClosed);
//!
//! let controller = PostController::new(PostClient::new(mock.client()));
//! // ... drive the controller ...
//! mock.verify();
//! ```
//!
//! For tests that want to inspect each request as it arrives, [`create_mock_client`] returns
//! the client together with the raw request receiver; [`expect_store`] pops the next `Store`.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, StoreAction};
use crate::schema::Payload;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: ResourceEntity> {
    Store {
        response: Result<T, FrameworkError>,
    },
    Find {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    All {
        response: Result<Vec<T>, FrameworkError>,
    },
    Modify {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ResourceEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in the order they were registered. A request of
/// the wrong kind, or with a different id, panics the mock task and the caller sees
/// `FrameworkError::ActorDropped`.
pub struct MockClient<T: ResourceEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Store { respond_to, .. },
                        Some(Expectation::Store { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Find { id, respond_to },
                        Some(Expectation::Find { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "find called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::All { respond_to }, Some(Expectation::All { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Modify { id, respond_to, .. },
                        Some(Expectation::Modify { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "modify called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_store(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Store { response }
        })
    }

    pub fn expect_find(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Find { id, response }
        })
    }

    pub fn expect_all(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::All {
            response,
        })
    }

    pub fn expect_modify(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Modify { id, response }
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder that queues one expectation with the response it should produce.
pub struct ExpectationBuilder<T: ResourceEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ResourceEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Queue<T>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            make: Box::new(make),
        }
    }

    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        lock(&self.expectations).push_back(expectation);
    }

    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(Err(error));
        lock(&self.expectations).push_back(expectation);
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests land on.
///
/// The test plays the actor: it pulls each request off the receiver, asserts on it and
/// answers through the enclosed responder.
pub fn create_mock_client<T: ResourceEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is a `Store`.
pub async fn expect_store<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    StoreAction<T::Id>,
    Payload,
    Payload,
    oneshot::Sender<Result<T, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Store {
            action,
            input,
            forced,
            respond_to,
        }) => Some((action, input, forced, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Attributes;
    use crate::schema::{FieldValue, ModifyAction, SchemaError};

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    impl Attributes for Note {
        fn attribute(&self, name: &str) -> Option<FieldValue> {
            match name {
                "text" => Some(self.text.clone().into()),
                _ => None,
            }
        }

        fn set_attribute(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
            if name == "text" {
                self.text = value.into_text(name)?.unwrap_or_default();
            }
            Ok(())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Note error")]
    struct NoteError;

    impl ResourceEntity for Note {
        type Id = u32;
        type Context = ();
        type Error = NoteError;

        fn id(&self) -> u32 {
            self.id
        }

        fn new_record(id: u32) -> Self {
            Self {
                id,
                text: String::new(),
            }
        }
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_raw_channel_mock() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let store_task = tokio::spawn(async move {
            client
                .create(Payload::new().with("text", "hello"))
                .await
        });

        let (action, input, forced, responder) = expect_store(&mut receiver)
            .await
            .expect("Expected Store request");
        assert_eq!(action, StoreAction::Create);
        assert_eq!(input.get("text"), Some(&FieldValue::from("hello")));
        assert!(forced.is_empty());
        responder.send(Ok(note(1, "hello"))).unwrap();

        let stored = store_task.await.unwrap().unwrap();
        assert_eq!(stored.id, 1);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_store().return_ok(note(1, "hi"));
        mock.expect_find(1).return_ok(Some(note(1, "hi")));
        mock.expect_modify(1).return_err(FrameworkError::NotFound("1".into()));

        let client = mock.client();
        let stored = client.create(Payload::new()).await.unwrap();
        assert_eq!(stored.text, "hi");

        let found = client.find(1).await.unwrap();
        assert_eq!(found, Some(note(1, "hi")));

        let modified = client.modify(1, ModifyAction::Hide, None).await;
        assert!(matches!(modified, Err(FrameworkError::NotFound(_))));

        mock.verify();
    }
}
