//! # Handler Traits
//!
//! A resource type exposes its capabilities through four kinds of user-supplied
//! handlers. Each kind is an `#[async_trait]` trait so that it can be stored as a
//! trait object inside a [`TypeDefinition`](crate::framework::TypeDefinition), and
//! each has a blanket implementation for async closures with the matching
//! signature, so the common case is just:
//!
//! ```rust
//! use rest_dispatch::framework::{Meta, TypeDefinition};
//! use serde_json::{json, Value};
//!
//! let users = TypeDefinition::<()>::new()
//!     .with_list(|_data: Option<Value>, _meta: Meta<()>| async move {
//!         Ok(json!([{ "id": "1" }]))
//!     })
//!     .with_get(|id: String, _data: Option<Value>, _meta: Meta<()>| async move {
//!         Ok(json!({ "id": id }))
//!     });
//!
//! assert!(users.list.is_some());
//! assert!(users.create.is_none());
//! ```
//!
//! Every handler receives the same [`Meta`]: the opaque request context and the
//! ancestor chain of the addressed resource.

use crate::framework::error::HandlerError;
use crate::routing::ReferrerLink;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// What every handler resolves to.
pub type HandlerResult = Result<Value, HandlerError>;

/// The uniform metadata threaded into every handler invocation.
#[derive(Debug)]
pub struct Meta<C> {
    /// Context built by the transport layer, shared unchanged between handlers.
    pub context: Arc<C>,
    /// Nearest ancestor entity first; `None` for root resources.
    pub referrer: Option<ReferrerLink>,
}

impl<C> Meta<C> {
    pub fn new(context: Arc<C>, referrer: Option<ReferrerLink>) -> Self {
        Self { context, referrer }
    }
}

// Derived `Clone` would require `C: Clone`.
impl<C> Clone for Meta<C> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            referrer: self.referrer.clone(),
        }
    }
}

/// Collection-scoped CRUD operation (`list`, `create`, `replace`).
#[async_trait]
pub trait CollectionHandler<C>: Send + Sync {
    async fn handle(&self, data: Option<Value>, meta: Meta<C>) -> HandlerResult;
}

/// Entity-scoped CRUD operation (`get`, `edit`, `delete`).
#[async_trait]
pub trait EntityHandler<C>: Send + Sync {
    async fn handle(&self, id: String, data: Option<Value>, meta: Meta<C>) -> HandlerResult;
}

/// The `invoke` function of a named action.
#[async_trait]
pub trait ActionInvoker<C>: Send + Sync {
    async fn invoke(&self, id: Option<String>, data: Option<Value>, meta: Meta<C>)
        -> HandlerResult;
}

/// A computed, read-only outbound field.
#[async_trait]
pub trait FieldResolver<C>: Send + Sync {
    async fn resolve(&self, id: Option<String>, meta: Meta<C>) -> HandlerResult;
}

#[async_trait]
impl<C, F, Fut> CollectionHandler<C> for F
where
    C: Send + Sync + 'static,
    F: Fn(Option<Value>, Meta<C>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn handle(&self, data: Option<Value>, meta: Meta<C>) -> HandlerResult {
        (self)(data, meta).await
    }
}

#[async_trait]
impl<C, F, Fut> EntityHandler<C> for F
where
    C: Send + Sync + 'static,
    F: Fn(String, Option<Value>, Meta<C>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn handle(&self, id: String, data: Option<Value>, meta: Meta<C>) -> HandlerResult {
        (self)(id, data, meta).await
    }
}

#[async_trait]
impl<C, F, Fut> ActionInvoker<C> for F
where
    C: Send + Sync + 'static,
    F: Fn(Option<String>, Option<Value>, Meta<C>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn invoke(
        &self,
        id: Option<String>,
        data: Option<Value>,
        meta: Meta<C>,
    ) -> HandlerResult {
        (self)(id, data, meta).await
    }
}

#[async_trait]
impl<C, F, Fut> FieldResolver<C> for F
where
    C: Send + Sync + 'static,
    F: Fn(Option<String>, Meta<C>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn resolve(&self, id: Option<String>, meta: Meta<C>) -> HandlerResult {
        (self)(id, meta).await
    }
}
