//! # Mock Handlers & Testing Guide
//!
//! [`MockHandler`] stands in for any user-supplied handler: it implements
//! [`CollectionHandler`], [`EntityHandler`], [`ActionInvoker`] and
//! [`FieldResolver`] for every context type. Each call is recorded with the
//! id, data, ancestor chain and context it received, and answered from a queue
//! of canned responses.
//!
//! | Feature | MockHandler | Closure handler |
//! |---------|-------------|-----------------|
//! | **Call inspection** | Built in (`calls()`) | Manual |
//! | **Error injection** | `return_err` | Manual |
//! | **Real logic** | None | Whatever you write |
//! | **Use Case** | Testing routing *around* the handler | End-to-end flows |
//!
//! ```rust
//! use http::Method;
//! use rest_dispatch::dispatch::{handle_request, Response};
//! use rest_dispatch::framework::{ResourceType, TypeDefinition, TypeRegistry};
//! use rest_dispatch::mock::MockHandler;
//! use rest_dispatch::routing::find_type;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Setup expectations
//!     let get = MockHandler::new();
//!     get.return_ok(json!({ "id": "42" }));
//!
//!     // 2. Register the mock as the `get` handler
//!     let registry = TypeRegistry::<()>::new()
//!         .register(ResourceType::new("users", TypeDefinition::new().with_get(get.clone())));
//!
//!     // 3. Dispatch
//!     let endpoint = find_type(&registry, "/users/42");
//!     let response = handle_request(&Method::GET, None, &endpoint, Arc::new(())).await.unwrap();
//!
//!     assert_eq!(response, Response::ok(json!({ "id": "42" })));
//!     assert_eq!(get.calls()[0].id.as_deref(), Some("42"));
//!     get.verify();
//! }
//! ```
//!
//! Handlers that are never expected to run can be asserted with
//! [`MockHandler::verify_called`]`(0)`; this is how the 404/405 paths are
//! checked to leave handlers untouched.

use crate::framework::{
    ActionInvoker, CollectionHandler, EntityHandler, FieldResolver, HandlerError, HandlerResult,
    Meta,
};
use crate::routing::ReferrerLink;
use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Entity id; always `None` for collection handlers.
    pub id: Option<String>,
    /// Request data; always `None` for field resolvers.
    pub data: Option<Value>,
    pub referrer: Option<ReferrerLink>,
    /// The context, type-erased. Recover it with `Arc::downcast`.
    pub context: Arc<dyn Any + Send + Sync>,
}

enum Expectation {
    Ok(Value),
    Err(String),
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<RecordedCall>,
}

/// A recording handler with queued responses. Clones share state.
#[derive(Clone, Default)]
pub struct MockHandler {
    state: Arc<Mutex<MockState>>,
}

impl MockHandler {
    /// Creates a handler with no expectations; unexpected calls resolve to `null`.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a successful response for the next call.
    pub fn return_ok(&self, value: Value) {
        self.state().expectations.push_back(Expectation::Ok(value));
    }

    /// Queues a failure for the next call.
    pub fn return_err(&self, message: impl Into<String>) {
        self.state()
            .expectations
            .push_back(Expectation::Err(message.into()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Panics unless the handler ran exactly `expected` times.
    pub fn verify_called(&self, expected: usize) {
        let actual = self.call_count();
        if actual != expected {
            panic!("Expected {expected} call(s), got {actual}");
        }
    }

    /// Panics unless every queued response was consumed.
    pub fn verify(&self) {
        let remaining = self.state().expectations.len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn record<C>(&self, id: Option<String>, data: Option<Value>, meta: Meta<C>) -> HandlerResult
    where
        C: Send + Sync + 'static,
    {
        let mut state = self.state();
        state.calls.push(RecordedCall {
            id,
            data,
            referrer: meta.referrer,
            context: meta.context,
        });
        match state.expectations.pop_front() {
            Some(Expectation::Ok(value)) => Ok(value),
            Some(Expectation::Err(message)) => Err(HandlerError::Message(message)),
            None => Ok(Value::Null),
        }
    }
}

impl std::fmt::Debug for MockHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("MockHandler")
            .field("calls", &state.calls.len())
            .field("pending", &state.expectations.len())
            .finish()
    }
}

#[async_trait]
impl<C> CollectionHandler<C> for MockHandler
where
    C: Send + Sync + 'static,
{
    async fn handle(&self, data: Option<Value>, meta: Meta<C>) -> HandlerResult {
        self.record(None, data, meta)
    }
}

#[async_trait]
impl<C> EntityHandler<C> for MockHandler
where
    C: Send + Sync + 'static,
{
    async fn handle(&self, id: String, data: Option<Value>, meta: Meta<C>) -> HandlerResult {
        self.record(Some(id), data, meta)
    }
}

#[async_trait]
impl<C> ActionInvoker<C> for MockHandler
where
    C: Send + Sync + 'static,
{
    async fn invoke(
        &self,
        id: Option<String>,
        data: Option<Value>,
        meta: Meta<C>,
    ) -> HandlerResult {
        self.record(id, data, meta)
    }
}

#[async_trait]
impl<C> FieldResolver<C> for MockHandler
where
    C: Send + Sync + 'static,
{
    async fn resolve(&self, id: Option<String>, meta: Meta<C>) -> HandlerResult {
        self.record(id, None, meta)
    }
}
