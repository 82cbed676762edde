//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out the same `ResourceClient<T>` used in production, but the
//! requests are answered from a queue of expectations instead of a running actor. It lets you
//! script return values and failures for unit tests without spawning any real actors.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real state management |
//! | **Use Case** | Unit testing logic *around* the client | Testing the actor itself or full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Client Logic Test (Pure Mock)</b></summary>
//!
//! **When to use**: Testing orchestration logic in your client wrappers without spinning up any actors.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::ActorEntity;
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Sku { id: String, price_cents: u64 }
//! #[derive(Debug)] struct SkuCreate { price_cents: u64 }
//! #[derive(Debug)] struct SkuUpdate;
//! #[derive(Debug, thiserror::Error)] #[error("sku error")] struct SkuError;
//!
//! #[async_trait]
//! impl ActorEntity for Sku {
//!     type Id = String; type Create = SkuCreate; type Update = SkuUpdate;
//!     type Context = (); type Error = SkuError;
//!     fn from_create_params(id: String, p: SkuCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, price_cents: p.price_cents })
//!     }
//!     async fn on_update(&mut self, _: SkuUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! /// Sums the price of every SKU that exists.
//! async fn price_of(client: &actor_framework::ResourceClient<Sku>, ids: Vec<String>) -> u64 {
//!     let skus = client.get_many(ids).await.unwrap_or_default();
//!     skus.iter().map(|s| s.price_cents).sum()
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Sku>::new();
//!     mock.expect_get_many(vec!["a".into(), "b".into()])
//!         .return_ok(vec![Sku { id: "a".into(), price_cents: 250 }]);
//!
//!     let total = price_of(&mock.client(), vec!["a".into(), "b".into()]).await;
//!     assert_eq!(total, 250);
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Single Actor Test (Fast, Isolated)</b></summary>
//!
//! **When to use**: Testing a single actor's logic in isolation.
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Clone, Debug)] struct Counter { id: u32, value: u32 }
//! #[derive(Debug)] struct CounterCreate { start: u32 }
//! #[derive(Debug)] struct CounterUpdate { add: u32 }
//! #[derive(Debug, thiserror::Error)] #[error("overflow")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32; type Create = CounterCreate; type Update = CounterUpdate;
//!     type Context = (); type Error = CounterError;
//!     fn from_create_params(id: u32, p: CounterCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, value: p.start })
//!     }
//!     async fn on_update(&mut self, u: CounterUpdate, _: &()) -> Result<(), Self::Error> {
//!         self.value = self.value.checked_add(u.add).ok_or(CounterError)?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let next = AtomicU32::new(1);
//!     let (actor, client) =
//!         ResourceActor::<Counter>::new(10, move || next.fetch_add(1, Ordering::SeqCst));
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(CounterCreate { start: 40 }).await.unwrap();
//!     let counter = client.update(id, CounterUpdate { add: 2 }).await.unwrap();
//!     assert_eq!(counter.value, 42);
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Service with Mocked Dependencies (Sweet Spot)</b></summary>
//!
//! **When to use**: Testing a component that depends on several actors, while isolating it from them.
//!
//! ```text
//! This needs several clients and is verbose to write inline.
//! See tests/order_service_test.rs in the order-service crate for a full example.
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 3: Full System Integration Test (Comprehensive)</b></summary>
//!
//! **When to use**: Testing the entire system working together, end-to-end flows, concurrency.
//!
//! See `tests/integration_test.rs` in the order-service crate.
//! </details>
//!
//! ## Testing Failure Scenarios
//!
//! `MockClient` makes it easy to simulate errors that are hard to reproduce with real actors,
//! such as an actor that has shut down mid-request.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Sku { id: String }
//! #[derive(Debug)] struct SkuCreate;
//! #[derive(Debug)] struct SkuUpdate;
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct SkuError;
//!
//! #[async_trait]
//! impl ActorEntity for Sku {
//!     type Id = String; type Create = SkuCreate; type Update = SkuUpdate;
//!     type Context = (); type Error = SkuError;
//!     fn from_create_params(id: String, _: SkuCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: SkuUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Sku>::new();
//!     let client = mock.client();
//!
//!     mock.expect_get("a".into()).return_err(FrameworkError::ActorClosed);
//!
//!     let result = client.get("a".into()).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//! }
//! ```
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and a receiver, or use the fluent [`MockClient`] API.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the canned reply for it.
enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    GetMany {
        ids: Vec<T::Id>,
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in FIFO order. A request that does not match the next
/// expectation (wrong kind, or wrong ID) panics the background task, which the caller
/// observes as `FrameworkError::ActorDropped`.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Account>::new();
/// mock.expect_get(account_id.clone()).return_ok(Some(account));
/// mock.expect_create().return_ok(new_id);
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "get called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::GetMany { ids, respond_to },
                        Some(Expectation::GetMany {
                            ids: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(ids, expected, "get_many called with unexpected ids");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "update called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "delete called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
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

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Create { response }
        })
    }

    /// Expects a `get` operation for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Get { id, response }
        })
    }

    /// Expects a `get_many` operation for exactly `ids`, in that order.
    pub fn expect_get_many(&mut self, ids: Vec<T::Id>) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::GetMany { ids, response }
        })
    }

    /// Expects an `update` operation for `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Update { id, response }
        })
    }

    /// Expects a `delete` operation for `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Delete { id, response }
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder that records the reply for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Expectations<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Expectations<T>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// Rather than spinning up a `ResourceActor`, the test holds the receiving end and plays
/// the actor itself: inspect the incoming request, then answer (or drop) the responder.
/// This allows simulating success, failure and delays deterministically.
///
/// **Note**: Consider using [`MockClient`] for a more fluent API.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Response<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetMany request
pub async fn expect_get_many<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Vec<T::Id>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::GetMany { ids, respond_to }) => Some((ids, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ActorEntity;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Member {
        id: String,
        handle: String,
    }

    #[derive(Debug)]
    struct MemberCreate {
        handle: String,
    }

    #[derive(Debug)]
    struct MemberUpdate;

    #[derive(Debug, thiserror::Error)]
    #[error("Member error")]
    struct MemberError;

    #[async_trait]
    impl ActorEntity for Member {
        type Id = String;
        type Create = MemberCreate;
        type Update = MemberUpdate;
        type Context = ();
        type Error = MemberError;

        fn from_create_params(id: String, params: MemberCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                handle: params.handle,
            })
        }

        async fn on_update(
            &mut self,
            _update: MemberUpdate,
            _ctx: &Self::Context,
        ) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn member(id: &str, handle: &str) -> Member {
        Member {
            id: id.to_string(),
            handle: handle.to_string(),
        }
    }

    #[tokio::test]
    async fn test_channel_level_mock() {
        let (client, mut receiver) = create_mock_client::<Member>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(MemberCreate {
                    handle: "ada".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.handle, "ada");
        responder.send(Ok("m-1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap(), "m-1");
    }

    #[tokio::test]
    async fn test_channel_level_get_many() {
        let (client, mut receiver) = create_mock_client::<Member>(10);

        let task = tokio::spawn(async move {
            client
                .get_many(vec!["m-1".to_string(), "m-2".to_string()])
                .await
        });

        let (ids, responder) = expect_get_many(&mut receiver)
            .await
            .expect("Expected GetMany request");
        assert_eq!(ids, vec!["m-1".to_string(), "m-2".to_string()]);
        responder.send(Ok(vec![member("m-2", "bob")])).unwrap();

        let found = task.await.unwrap().unwrap();
        assert_eq!(found, vec![member("m-2", "bob")]);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Member>::new();

        mock.expect_create().return_ok("m-1".to_string());
        mock.expect_get("m-1".to_string())
            .return_ok(Some(member("m-1", "ada")));
        mock.expect_update("m-1".to_string())
            .return_ok(member("m-1", "ada_l"));
        mock.expect_delete("m-1".to_string()).return_ok(());

        let client = mock.client();

        let id = client
            .create(MemberCreate {
                handle: "ada".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, "m-1");

        let fetched = client.get(id.clone()).await.unwrap();
        assert_eq!(fetched.unwrap().handle, "ada");

        let updated = client.update(id.clone(), MemberUpdate).await.unwrap();
        assert_eq!(updated.handle, "ada_l");

        client.delete(id).await.unwrap();

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_client_mismatch_surfaces_as_dropped() {
        let mut mock = MockClient::<Member>::new();
        mock.expect_get("m-1".to_string()).return_ok(None);

        let result = mock.client().delete("m-1".to_string()).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unmet_expectations() {
        let mut mock = MockClient::<Member>::new();
        mock.expect_get("m-1".to_string()).return_ok(None);
        mock.verify();
    }
}
