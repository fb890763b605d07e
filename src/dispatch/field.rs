//! Routes `fields/<name>` to a computed-field resolver.

use crate::dispatch::query::QueryEndpoint;
use crate::dispatch::response::Response;
use crate::framework::{HandlerError, OutboundField};
use http::Method;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fields have no sub-resources: exactly one segment, GET only.
pub async fn handle_outbound_field<C>(
    method: &Method,
    target: &QueryEndpoint<'_, C>,
    context: Arc<C>,
) -> Result<Response, HandlerError>
where
    C: Send + Sync + 'static,
{
    let [name] = target.segments.as_slice() else {
        warn!(segments = ?target.segments, "Unroutable field query");
        return Ok(Response::not_found());
    };

    // Nested relations live in the same map but are addressed by path, not here.
    let Some(resolver) = target
        .definition
        .outbound_fields
        .get(*name)
        .and_then(OutboundField::as_resolver)
    else {
        warn!(field = name, "Unknown field");
        return Ok(Response::not_found());
    };

    if method != Method::GET {
        warn!(field = name, %method, "Field requires GET");
        return Ok(Response::method_not_allowed([&Method::GET]));
    }

    debug!(field = name, id = target.id, "Resolving field");
    let value = resolver
        .resolve(target.owned_id(), target.meta(context))
        .await?;
    Ok(Response::ok(value))
}
