//! # Request Dispatch
//!
//! Maps a method plus a resolved [`Endpoint`] onto the matching handler of the
//! addressed resource type.
//!
//! ## Method tables
//!
//! | Scope      | Method   | Handler   | Status |
//! |------------|----------|-----------|--------|
//! | collection | `GET`    | `list`    | 200    |
//! | collection | `POST`   | `create`  | 201    |
//! | collection | `PUT`    | `replace` | 200    |
//! | entity     | `GET`    | `get`     | 200    |
//! | entity     | `PATCH`  | `edit`    | 200    |
//! | entity     | `DELETE` | `delete`  | 200    |
//!
//! A method with no present handler answers 405 with an `Allow` header when any
//! handler of the same table is present, and 404 otherwise. Endpoints carrying a
//! query (`actions/...`, `fields/...`) go through [`handle_query_request`].
//!
//! Handler failures are returned as `Err` and never converted to a status here.

mod action;
mod descriptor;
mod field;
mod query;
mod response;

pub use action::handle_action;
pub use descriptor::describe_actions;
pub use field::handle_outbound_field;
pub use query::{handle_query_request, QueryEndpoint};
pub use response::Response;

use crate::framework::{
    CollectionHandler, EntityHandler, HandlerError, Meta, TypeDefinition,
};
use crate::routing::Endpoint;
use http::{Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collection-scoped CRUD operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOperation {
    List,
    Create,
    Replace,
}

impl CollectionOperation {
    pub fn handler<C>(self, definition: &TypeDefinition<C>) -> Option<&Arc<dyn CollectionHandler<C>>> {
        match self {
            CollectionOperation::List => definition.list.as_ref(),
            CollectionOperation::Create => definition.create.as_ref(),
            CollectionOperation::Replace => definition.replace.as_ref(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CollectionOperation::List => "list",
            CollectionOperation::Create => "create",
            CollectionOperation::Replace => "replace",
        }
    }
}

/// Entity-scoped CRUD operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOperation {
    Get,
    Edit,
    Delete,
}

impl EntityOperation {
    pub fn handler<C>(self, definition: &TypeDefinition<C>) -> Option<&Arc<dyn EntityHandler<C>>> {
        match self {
            EntityOperation::Get => definition.get.as_ref(),
            EntityOperation::Edit => definition.edit.as_ref(),
            EntityOperation::Delete => definition.delete.as_ref(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityOperation::Get => "get",
            EntityOperation::Edit => "edit",
            EntityOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for CollectionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for EntityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of a method table.
#[derive(Debug)]
pub struct Route<Op> {
    pub method: Method,
    pub operation: Op,
    pub status: StatusCode,
}

/// Declaration order is the `Allow` header order.
pub const COLLECTION_ROUTES: [Route<CollectionOperation>; 3] = [
    Route {
        method: Method::GET,
        operation: CollectionOperation::List,
        status: StatusCode::OK,
    },
    Route {
        method: Method::POST,
        operation: CollectionOperation::Create,
        status: StatusCode::CREATED,
    },
    Route {
        method: Method::PUT,
        operation: CollectionOperation::Replace,
        status: StatusCode::OK,
    },
];

/// Declaration order is the `Allow` header order.
pub const ENTITY_ROUTES: [Route<EntityOperation>; 3] = [
    Route {
        method: Method::GET,
        operation: EntityOperation::Get,
        status: StatusCode::OK,
    },
    Route {
        method: Method::PATCH,
        operation: EntityOperation::Edit,
        status: StatusCode::OK,
    },
    Route {
        method: Method::DELETE,
        operation: EntityOperation::Delete,
        status: StatusCode::OK,
    },
];

/// Picks the row for `method` whose handler is present, or the 404/405 answer.
fn select_route<'t, Op, H>(
    routes: &'t [Route<Op>],
    method: &Method,
    lookup: impl Fn(Op) -> Option<H>,
) -> Result<(&'t Route<Op>, H), Response>
where
    Op: Copy,
{
    let selected = routes
        .iter()
        .filter(|route| route.method == *method)
        .find_map(|route| lookup(route.operation).map(|handler| (route, handler)));
    if let Some(selected) = selected {
        return Ok(selected);
    }

    let allowed: Vec<&Method> = routes
        .iter()
        .filter(|route| lookup(route.operation).is_some())
        .map(|route| &route.method)
        .collect();
    if allowed.is_empty() {
        Err(Response::not_found())
    } else {
        Err(Response::method_not_allowed(allowed))
    }
}

/// Top-level dispatch entry point.
///
/// `context` is passed unchanged to whichever handler runs, together with the
/// endpoint's ancestor chain.
pub async fn handle_request<C>(
    method: &Method,
    data: Option<Value>,
    endpoint: &Endpoint<'_, C>,
    context: Arc<C>,
) -> Result<Response, HandlerError>
where
    C: Send + Sync + 'static,
{
    let Some(definition) = endpoint.ty.definition() else {
        warn!(%method, "Not found");
        return Ok(Response::not_found());
    };

    if endpoint.query.is_some() {
        return handle_query_request(method, data, endpoint, context).await;
    }

    let meta = Meta::new(context, endpoint.referrer.clone());
    match endpoint.id.as_deref() {
        None => {
            let (route, handler) = match select_route(&COLLECTION_ROUTES, method, |operation| {
                operation.handler(definition)
            }) {
                Ok(selected) => selected,
                Err(response) => {
                    warn!(
                        %method,
                        status = %response.status,
                        allow = response.allow(),
                        "Collection request rejected"
                    );
                    return Ok(response);
                }
            };
            debug!(%method, operation = %route.operation, "Dispatching collection request");
            let body = handler.handle(data, meta).await?;
            info!(operation = %route.operation, status = %route.status, "Handled");
            Ok(Response::success(route.status, body))
        }
        Some(id) => {
            let (route, handler) = match select_route(&ENTITY_ROUTES, method, |operation| {
                operation.handler(definition)
            }) {
                Ok(selected) => selected,
                Err(response) => {
                    warn!(
                        %method,
                        id,
                        status = %response.status,
                        allow = response.allow(),
                        "Entity request rejected"
                    );
                    return Ok(response);
                }
            };
            debug!(%method, id, operation = %route.operation, "Dispatching entity request");
            let body = handler.handle(id.to_string(), data, meta).await?;
            info!(id, operation = %route.operation, status = %route.status, "Handled");
            Ok(Response::success(route.status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{ResourceType, TypeRegistry};
    use crate::mock::MockHandler;
    use crate::routing::{find_type, ReferrerLink};
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Ctx {
        user_id: &'static str,
    }

    fn ctx() -> Arc<Ctx> {
        Arc::new(Ctx { user_id: "f00d" })
    }

    fn registry_with(definition: TypeDefinition<Ctx>) -> TypeRegistry<Ctx> {
        TypeRegistry::new().register(ResourceType::new("users", definition))
    }

    async fn collection_case(method: Method, status: StatusCode, attach: fn(TypeDefinition<Ctx>, MockHandler) -> TypeDefinition<Ctx>) {
        let handler = MockHandler::new();
        handler.return_ok(json!({ "name": "Ada" }));
        let registry = registry_with(attach(TypeDefinition::new(), handler.clone()));
        let endpoint = find_type(&registry, "/users");

        let context = ctx();
        let response = handle_request(&method, Some(json!({ "in": 1 })), &endpoint, context.clone())
            .await
            .unwrap();

        assert_eq!(response, Response::success(status, json!({ "name": "Ada" })));
        handler.verify_called(1);
        let call = &handler.calls()[0];
        assert_eq!(call.id, None);
        assert_eq!(call.data, Some(json!({ "in": 1 })));
        assert_eq!(call.referrer, None);
        assert!(Arc::ptr_eq(
            &call.context.clone().downcast::<Ctx>().unwrap(),
            &context
        ));
    }

    async fn entity_case(method: Method, attach: fn(TypeDefinition<Ctx>, MockHandler) -> TypeDefinition<Ctx>) {
        let handler = MockHandler::new();
        handler.return_ok(json!({ "name": "Grace" }));
        let users = TypeDefinition::new().with_relation("posts", attach(TypeDefinition::new(), handler.clone()));
        let registry = registry_with(users);
        let endpoint = find_type(&registry, "/users/u1/posts/p9");

        let response = handle_request(&method, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(response, Response::ok(json!({ "name": "Grace" })));
        handler.verify_called(1);
        let call = &handler.calls()[0];
        assert_eq!(call.id.as_deref(), Some("p9"));
        assert_eq!(call.referrer, Some(ReferrerLink::new("u1", "users", None)));
    }

    #[tokio::test]
    async fn test_collection_get_maps_to_list() {
        collection_case(Method::GET, StatusCode::OK, |d, h| d.with_list(h)).await;
    }

    #[tokio::test]
    async fn test_collection_post_maps_to_create() {
        collection_case(Method::POST, StatusCode::CREATED, |d, h| d.with_create(h)).await;
    }

    #[tokio::test]
    async fn test_collection_put_maps_to_replace() {
        collection_case(Method::PUT, StatusCode::OK, |d, h| d.with_replace(h)).await;
    }

    #[tokio::test]
    async fn test_entity_get_maps_to_get() {
        entity_case(Method::GET, |d, h| d.with_get(h)).await;
    }

    #[tokio::test]
    async fn test_entity_patch_maps_to_edit() {
        entity_case(Method::PATCH, |d, h| d.with_edit(h)).await;
    }

    #[tokio::test]
    async fn test_entity_delete_maps_to_delete() {
        entity_case(Method::DELETE, |d, h| d.with_delete(h)).await;
    }

    #[tokio::test]
    async fn test_404_when_table_has_no_handler() {
        // Only a collection handler: the entity table is empty.
        let create = MockHandler::new();
        let registry = registry_with(TypeDefinition::new().with_create(create.clone()));
        let endpoint = find_type(&registry, "/users/u1");

        let response = handle_request(&Method::GET, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(response, Response::not_found());
        create.verify_called(0);
    }

    #[tokio::test]
    async fn test_405_lists_present_handlers_in_table_order() {
        let delete = MockHandler::new();
        let get = MockHandler::new();
        let registry = registry_with(
            TypeDefinition::new()
                .with_delete(delete.clone())
                .with_get(get.clone()),
        );
        let endpoint = find_type(&registry, "/users/u1");

        let response = handle_request(&Method::PUT, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.allow(), Some("GET, DELETE"));
        get.verify_called(0);
        delete.verify_called(0);
    }

    #[tokio::test]
    async fn test_405_for_known_method_without_handler() {
        let registry = registry_with(TypeDefinition::new().with_delete(MockHandler::new()));
        let endpoint = find_type(&registry, "/users/u1");

        let response = handle_request(&Method::GET, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.allow(), Some("DELETE"));
    }

    #[tokio::test]
    async fn test_extension_method_is_rejected() {
        let registry = registry_with(TypeDefinition::new().with_list(MockHandler::new()));
        let endpoint = find_type(&registry, "/users");
        let purge = Method::from_bytes(b"PURGE").unwrap();

        let response = handle_request(&purge, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(response.allow(), Some("GET"));
    }

    #[tokio::test]
    async fn test_unresolved_endpoint_is_404_even_with_query() {
        let registry = TypeRegistry::<Ctx>::new();
        let endpoint = find_type(&registry, "/ghosts/g1/actions");

        let response = handle_request(&Method::GET, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(response, Response::not_found());
    }

    #[tokio::test]
    async fn test_handler_failure_propagates() {
        let handler = MockHandler::new();
        handler.return_err("storage offline");
        let registry = registry_with(TypeDefinition::new().with_list(handler.clone()));
        let endpoint = find_type(&registry, "/users");

        let result = handle_request(&Method::GET, None, &endpoint, ctx()).await;

        assert!(matches!(result, Err(HandlerError::Message(ref msg)) if msg == "storage offline"));
    }

    #[tokio::test]
    async fn test_dispatch_is_repeatable() {
        let registry = registry_with(
            TypeDefinition::new()
                .with_list(|_: Option<Value>, meta: Meta<Ctx>| async move {
                    Ok(json!({ "user": meta.context.user_id }))
                }),
        );
        let endpoint = find_type(&registry, "/users");

        let first = handle_request(&Method::GET, None, &endpoint, ctx()).await.unwrap();
        let second = handle_request(&Method::GET, None, &endpoint, ctx()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.body, Some(json!({ "user": "f00d" })));
    }
}
