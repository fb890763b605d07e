use crate::dispatch::{handle_request, Response};
use crate::framework::{HandlerError, ResourceType, RestError, TypeRegistry};
use crate::routing::find_type;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Transport-neutral view of an incoming request.
///
/// The transport layer builds one per request; no decoding happens past this point,
/// path segments are taken verbatim.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl IncomingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Builds the per-request context from the raw request.
#[async_trait]
pub trait ContextBuilder<C>: Send + Sync {
    async fn build(&self, request: &IncomingRequest) -> Result<C, HandlerError>;
}

#[async_trait]
impl<C, F, Fut> ContextBuilder<C> for F
where
    C: Send + 'static,
    F: Fn(&IncomingRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<C, HandlerError>> + Send,
{
    async fn build(&self, request: &IncomingRequest) -> Result<C, HandlerError> {
        (self)(request).await
    }
}

/// Where handler context comes from.
pub enum ContextSource<C> {
    /// One value shared by every request.
    Shared(Arc<C>),
    /// Built per request.
    Builder(Arc<dyn ContextBuilder<C>>),
}

impl<C> ContextSource<C> {
    pub fn shared(context: C) -> Self {
        ContextSource::Shared(Arc::new(context))
    }

    pub fn builder(builder: impl ContextBuilder<C> + 'static) -> Self {
        ContextSource::Builder(Arc::new(builder))
    }

    async fn resolve(&self, request: &IncomingRequest) -> Result<Arc<C>, RestError> {
        match self {
            ContextSource::Shared(context) => Ok(Arc::clone(context)),
            ContextSource::Builder(builder) => builder
                .build(request)
                .await
                .map(Arc::new)
                .map_err(RestError::Context),
        }
    }
}

impl Default for ContextSource<()> {
    fn default() -> Self {
        ContextSource::shared(())
    }
}

/// The process-wide entry point: owns the registry and turns requests into responses.
///
/// # Registry Snapshots
///
/// The registry lives in a `watch` channel as an `Arc<TypeRegistry>`. Registration
/// swaps in a new registry; each request resolves against whichever snapshot was
/// current when it arrived, so it never sees a half-applied registration.
///
/// # Example
///
/// ```rust
/// use http::{Method, StatusCode};
/// use rest_dispatch::framework::{Meta, ResourceType, TypeDefinition};
/// use rest_dispatch::lifecycle::{ContextSource, IncomingRequest, RestService};
/// use serde_json::{json, Value};
///
/// #[tokio::main]
/// async fn main() {
///     let service = RestService::new(ContextSource::shared("tenant-a"));
///     service.register_type(ResourceType::new(
///         "users",
///         TypeDefinition::new().with_list(|_: Option<Value>, meta: Meta<&'static str>| async move {
///             Ok(json!({ "tenant": *meta.context }))
///         }),
///     ));
///
///     let response = service.handle(IncomingRequest::new(Method::GET, "/users")).await.unwrap();
///     assert_eq!(response.status, StatusCode::OK);
///     assert_eq!(response.body, Some(json!({ "tenant": "tenant-a" })));
/// }
/// ```
pub struct RestService<C> {
    types: watch::Sender<Arc<TypeRegistry<C>>>,
    context: ContextSource<C>,
}

impl<C> RestService<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(context: ContextSource<C>) -> Self {
        let (types, _) = watch::channel(Arc::new(TypeRegistry::new()));
        Self { types, context }
    }

    /// Registers (or replaces) a resource type. Requests already in flight keep
    /// the snapshot they started with.
    pub fn register_type(&self, resource: ResourceType<C>) {
        let name = resource.resource_name.clone();
        self.types.send_modify(|types| {
            *types = Arc::new(types.register(resource));
        });
        info!(resource = %name, "Type registered");
    }

    /// The current registry snapshot.
    pub fn registered_types(&self) -> Arc<TypeRegistry<C>> {
        Arc::clone(&self.types.borrow())
    }

    /// Resolves and dispatches one request.
    ///
    /// Unknown resources answer 404 before any context is built. Handler and
    /// context-builder failures are returned as `Err` for the transport to map.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn handle(&self, request: IncomingRequest) -> Result<Response, RestError> {
        let types = self.registered_types();
        let endpoint = find_type(&*types, &request.path);
        if !endpoint.ty.is_found() {
            warn!("Not found");
            return Ok(Response::not_found());
        }
        debug!(id = ?endpoint.id, query = ?endpoint.query, "Resolved endpoint");

        let context = self.context.resolve(&request).await?;
        let IncomingRequest { method, body, .. } = request;
        let response = handle_request(&method, body, &endpoint, context).await?;
        debug!(status = %response.status, "Responding");
        Ok(response)
    }
}

impl<C> std::fmt::Debug for RestService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestService")
            .field("types", &*self.types.borrow())
            .finish_non_exhaustive()
    }
}
