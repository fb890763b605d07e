//! # Resource Type Definitions
//!
//! A [`TypeDefinition`] is a resource's capability set. Capabilities are pure
//! presence/absence: a `None` handler slot means the operation is not supported,
//! and the dispatcher answers with 404 or 405 accordingly. There is no
//! inheritance between types.

use crate::framework::handler::{ActionInvoker, CollectionHandler, EntityHandler, FieldResolver};
use http::{Method, StatusCode};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// An entry in a type's `outbound_fields` map.
pub enum OutboundField<C> {
    /// A nested resource type reachable as `/<parent>/<id>/<name>`.
    Relation(TypeDefinition<C>),
    /// A computed field readable as `/<parent>/<id>/fields/<name>`.
    Resolver(Arc<dyn FieldResolver<C>>),
}

impl<C> OutboundField<C> {
    pub fn as_relation(&self) -> Option<&TypeDefinition<C>> {
        match self {
            OutboundField::Relation(definition) => Some(definition),
            OutboundField::Resolver(_) => None,
        }
    }

    pub fn as_resolver(&self) -> Option<&Arc<dyn FieldResolver<C>>> {
        match self {
            OutboundField::Relation(_) => None,
            OutboundField::Resolver(resolver) => Some(resolver),
        }
    }
}

impl<C> fmt::Debug for OutboundField<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundField::Relation(definition) => {
                f.debug_tuple("Relation").field(definition).finish()
            }
            OutboundField::Resolver(_) => f.write_str("Resolver"),
        }
    }
}

/// A named, method-scoped operation on a resource.
pub struct Action<C> {
    /// The single method `invoke` accepts.
    pub method: Method,
    pub invoke: Arc<dyn ActionInvoker<C>>,
    /// Opaque document served at `actions/<name>/description`.
    pub description: Value,
    /// Overrides the default 200 on a successful invoke.
    pub success_status: Option<StatusCode>,
}

impl<C> Action<C> {
    pub fn new(method: Method, invoke: impl ActionInvoker<C> + 'static) -> Self {
        Self {
            method,
            invoke: Arc::new(invoke),
            description: Value::Null,
            success_status: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<Value>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_success_status(mut self, status: StatusCode) -> Self {
        self.success_status = Some(status);
        self
    }

    pub fn success_status(&self) -> StatusCode {
        self.success_status.unwrap_or(StatusCode::OK)
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("method", &self.method)
            .field("description", &self.description)
            .field("success_status", &self.success_status)
            .finish_non_exhaustive()
    }
}

/// A resource's capability set.
///
/// Built fluently; every slot starts empty:
///
/// ```rust
/// use http::{Method, StatusCode};
/// use rest_dispatch::framework::{Action, Meta, TypeDefinition};
/// use serde_json::{json, Value};
///
/// let posts = TypeDefinition::<()>::new()
///     .with_get(|id: String, _: Option<Value>, _: Meta<()>| async move { Ok(json!({ "id": id })) });
///
/// let users = TypeDefinition::<()>::new()
///     .with_relation("posts", posts)
///     .with_field("post_count", |_id: Option<String>, _: Meta<()>| async move { Ok(json!(3)) })
///     .with_action(
///         "ban",
///         Action::new(Method::POST, |_id: Option<String>, _: Option<Value>, _: Meta<()>| async move {
///             Ok(Value::Null)
///         })
///         .with_success_status(StatusCode::ACCEPTED),
///     );
///
/// assert!(users.relation("posts").is_some());
/// assert!(users.relation("post_count").is_none());
/// ```
pub struct TypeDefinition<C> {
    pub list: Option<Arc<dyn CollectionHandler<C>>>,
    pub create: Option<Arc<dyn CollectionHandler<C>>>,
    pub replace: Option<Arc<dyn CollectionHandler<C>>>,
    pub get: Option<Arc<dyn EntityHandler<C>>>,
    pub edit: Option<Arc<dyn EntityHandler<C>>>,
    pub delete: Option<Arc<dyn EntityHandler<C>>>,
    pub outbound_fields: HashMap<String, OutboundField<C>>,
    pub actions: BTreeMap<String, Action<C>>,
}

impl<C> Default for TypeDefinition<C> {
    fn default() -> Self {
        Self {
            list: None,
            create: None,
            replace: None,
            get: None,
            edit: None,
            delete: None,
            outbound_fields: HashMap::new(),
            actions: BTreeMap::new(),
        }
    }
}

impl<C> TypeDefinition<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, handler: impl CollectionHandler<C> + 'static) -> Self {
        self.list = Some(Arc::new(handler));
        self
    }

    pub fn with_create(mut self, handler: impl CollectionHandler<C> + 'static) -> Self {
        self.create = Some(Arc::new(handler));
        self
    }

    pub fn with_replace(mut self, handler: impl CollectionHandler<C> + 'static) -> Self {
        self.replace = Some(Arc::new(handler));
        self
    }

    pub fn with_get(mut self, handler: impl EntityHandler<C> + 'static) -> Self {
        self.get = Some(Arc::new(handler));
        self
    }

    pub fn with_edit(mut self, handler: impl EntityHandler<C> + 'static) -> Self {
        self.edit = Some(Arc::new(handler));
        self
    }

    pub fn with_delete(mut self, handler: impl EntityHandler<C> + 'static) -> Self {
        self.delete = Some(Arc::new(handler));
        self
    }

    /// Declares a nested resource type. Replaces any outbound field of the same name.
    pub fn with_relation(mut self, name: impl Into<String>, definition: TypeDefinition<C>) -> Self {
        self.outbound_fields
            .insert(name.into(), OutboundField::Relation(definition));
        self
    }

    /// Declares a computed field. Replaces any outbound field of the same name.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        resolver: impl FieldResolver<C> + 'static,
    ) -> Self {
        self.outbound_fields
            .insert(name.into(), OutboundField::Resolver(Arc::new(resolver)));
        self
    }

    pub fn with_action(mut self, name: impl Into<String>, action: Action<C>) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    /// Looks up a nested type; `None` if absent or if the name is a computed field.
    pub fn relation(&self, name: &str) -> Option<&TypeDefinition<C>> {
        self.outbound_fields
            .get(name)
            .and_then(OutboundField::as_relation)
    }

    pub fn action(&self, name: &str) -> Option<&Action<C>> {
        self.actions.get(name)
    }
}

impl<C> fmt::Debug for TypeDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("list", &self.list.is_some())
            .field("create", &self.create.is_some())
            .field("replace", &self.replace.is_some())
            .field("get", &self.get.is_some())
            .field("edit", &self.edit.is_some())
            .field("delete", &self.delete.is_some())
            .field("outbound_fields", &self.outbound_fields)
            .field("actions", &self.actions)
            .finish()
    }
}

/// Registration payload: a definition plus the resource name it is registered under.
#[derive(Debug)]
pub struct ResourceType<C> {
    pub resource_name: String,
    pub definition: TypeDefinition<C>,
}

impl<C> ResourceType<C> {
    pub fn new(resource_name: impl Into<String>, definition: TypeDefinition<C>) -> Self {
        Self {
            resource_name: resource_name.into(),
            definition,
        }
    }
}
