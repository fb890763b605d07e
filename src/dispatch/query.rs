//! Splits an endpoint's query into `actions` vs `fields` and forwards it.

use crate::dispatch::action::handle_action;
use crate::dispatch::field::handle_outbound_field;
use crate::dispatch::response::Response;
use crate::framework::{HandlerError, Meta, TypeDefinition};
use crate::routing::{Endpoint, ReferrerLink};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// An endpoint whose query has been split into segments, minus the leading
/// `actions`/`fields` selector.
#[derive(Debug)]
pub struct QueryEndpoint<'e, C> {
    pub definition: &'e TypeDefinition<C>,
    pub id: Option<&'e str>,
    pub referrer: Option<&'e ReferrerLink>,
    pub segments: Vec<&'e str>,
}

impl<C> QueryEndpoint<'_, C> {
    pub(crate) fn meta(&self, context: Arc<C>) -> Meta<C> {
        Meta::new(context, self.referrer.cloned())
    }

    pub(crate) fn owned_id(&self) -> Option<String> {
        self.id.map(str::to_string)
    }
}

pub async fn handle_query_request<C>(
    method: &Method,
    data: Option<Value>,
    endpoint: &Endpoint<'_, C>,
    context: Arc<C>,
) -> Result<Response, HandlerError>
where
    C: Send + Sync + 'static,
{
    let Some(definition) = endpoint.ty.definition() else {
        return Ok(Response::not_found());
    };
    let query = endpoint.query.as_deref().unwrap_or_default();
    let mut segments = query.split('/');
    let query_type = segments.next().unwrap_or_default();

    let target = QueryEndpoint {
        definition,
        id: endpoint.id.as_deref(),
        referrer: endpoint.referrer.as_ref(),
        segments: segments.collect(),
    };
    debug!(%method, query_type, segments = ?target.segments, "Dispatching query");

    match query_type {
        "actions" => handle_action(method, data, &target, context).await,
        "fields" => handle_outbound_field(method, &target, context).await,
        _ => {
            warn!(query_type, "Unknown query type");
            Ok(Response::not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{Action, ResourceType, TypeRegistry};
    use crate::mock::MockHandler;
    use crate::routing::{Endpoint, ResolvedType};
    use http::StatusCode;
    use serde_json::json;

    fn registry(invoke: MockHandler, field: MockHandler) -> TypeRegistry<()> {
        TypeRegistry::new().register(ResourceType::new(
            "users",
            TypeDefinition::new()
                .with_action("ban", Action::new(Method::POST, invoke))
                .with_field("karma", field),
        ))
    }

    fn endpoint<'r>(registry: &'r TypeRegistry<()>, query: &str) -> Endpoint<'r, ()> {
        Endpoint {
            ty: ResolvedType::Resolved(registry.get("users").unwrap()),
            id: Some("u1".to_string()),
            referrer: None,
            query: Some(query.to_string()),
        }
    }

    #[tokio::test]
    async fn test_routes_actions() {
        let invoke = MockHandler::new();
        invoke.return_ok(json!("banned"));
        let registry = registry(invoke.clone(), MockHandler::new());

        let response = handle_query_request(
            &Method::POST,
            Some(json!({ "days": 3 })),
            &endpoint(&registry, "actions/ban/invoke"),
            Arc::new(()),
        )
        .await
        .unwrap();

        assert_eq!(response, Response::ok(json!("banned")));
        invoke.verify_called(1);
        assert_eq!(invoke.calls()[0].data, Some(json!({ "days": 3 })));
    }

    #[tokio::test]
    async fn test_routes_fields() {
        let field = MockHandler::new();
        field.return_ok(json!(42));
        let registry = registry(MockHandler::new(), field.clone());

        let response = handle_query_request(
            &Method::GET,
            None,
            &endpoint(&registry, "fields/karma"),
            Arc::new(()),
        )
        .await
        .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Some(json!(42)));
        assert_eq!(field.calls()[0].id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_unknown_query_type_is_404() {
        let invoke = MockHandler::new();
        let registry = registry(invoke.clone(), MockHandler::new());

        let response = handle_query_request(
            &Method::GET,
            None,
            &endpoint(&registry, "relations/ban"),
            Arc::new(()),
        )
        .await
        .unwrap();

        assert_eq!(response, Response::not_found());
        invoke.verify_called(0);
    }
}
