//! Routes `actions[/<name>/<invoke|description>]`.

use crate::dispatch::descriptor::describe_actions;
use crate::dispatch::query::QueryEndpoint;
use crate::dispatch::response::Response;
use crate::framework::HandlerError;
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// - `actions` (GET): descriptor of every action on the type.
/// - `actions/<name>/invoke` (the action's method): runs the action.
/// - `actions/<name>/description` (GET): the action's description document.
///
/// Any other shape, or an unknown action name, is 404.
pub async fn handle_action<C>(
    method: &Method,
    data: Option<Value>,
    target: &QueryEndpoint<'_, C>,
    context: Arc<C>,
) -> Result<Response, HandlerError>
where
    C: Send + Sync + 'static,
{
    let definition = target.definition;

    let (name, rest) = match target.segments.as_slice() {
        [] => {
            if method != Method::GET {
                warn!(%method, "Actions listing requires GET");
                return Ok(Response::method_not_allowed([&Method::GET]));
            }
            return Ok(Response::ok(describe_actions(&definition.actions)));
        }
        [name, rest @ ..] => (*name, rest),
    };

    let Some(action) = definition.action(name) else {
        warn!(action = name, "Unknown action");
        return Ok(Response::not_found());
    };

    match rest {
        ["invoke"] => {
            if *method != action.method {
                warn!(action = name, %method, allow = %action.method, "Method not allowed");
                return Ok(Response::method_not_allowed([&action.method]));
            }
            debug!(action = name, id = target.id, "Invoking action");
            let result = action
                .invoke
                .invoke(target.owned_id(), data, target.meta(context))
                .await?;
            let status = action.success_status();
            info!(action = name, %status, "Action ok");
            Ok(Response::success(status, result))
        }
        ["description"] => {
            if method != Method::GET {
                warn!(action = name, %method, "Description requires GET");
                return Ok(Response::method_not_allowed([&Method::GET]));
            }
            Ok(Response::ok(action.description.clone()))
        }
        _ => {
            warn!(action = name, segments = ?rest, "Unroutable action query");
            Ok(Response::not_found())
        }
    }
}
