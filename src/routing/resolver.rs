//! # Path Resolution
//!
//! Walks an alternating `type/id/type/id/...` path against a [`TypeRegistry`].
//!
//! - Even segments (0, 2, ...) name a type: a registered resource at index 0,
//!   a nested relation of the previous type afterwards.
//! - Odd segments name an entity id of the type before them.
//! - `actions` and `fields` are reserved: the walk stops there and the rest of
//!   the path becomes the endpoint's `query`.
//!
//! Each nested type pushes its parent entity onto the ancestor chain, so the
//! chain's head is always the nearest ancestor. An unknown name anywhere stops
//! the walk with [`ResolvedType::NotFound`].

use crate::framework::{TypeDefinition, TypeRegistry};
use crate::routing::endpoint::{Endpoint, ReferrerLink, ResolvedType};
use tracing::{debug, trace};

/// Path segments that start a query instead of naming a type or id.
pub const RESERVED_KEYWORDS: [&str; 2] = ["actions", "fields"];

pub fn is_reserved(segment: &str) -> bool {
    RESERVED_KEYWORDS.contains(&segment)
}

/// Resolves `path` (which must start with `/`) into an [`Endpoint`].
///
/// ```rust
/// use rest_dispatch::framework::{ResourceType, TypeDefinition, TypeRegistry};
/// use rest_dispatch::routing::find_type;
///
/// let registry = TypeRegistry::<()>::new().register(ResourceType::new(
///     "users",
///     TypeDefinition::new().with_relation("posts", TypeDefinition::new()),
/// ));
///
/// let endpoint = find_type(&registry, "/users/u1/posts/p7/actions/publish/invoke");
/// assert!(endpoint.ty.is_found());
/// assert_eq!(endpoint.id.as_deref(), Some("p7"));
/// assert_eq!(endpoint.referrer.unwrap().to_string(), "users/u1");
/// assert_eq!(endpoint.query.as_deref(), Some("actions/publish/invoke"));
/// ```
pub fn find_type<'r, C>(registry: &'r TypeRegistry<C>, path: &str) -> Endpoint<'r, C> {
    let Some(rest) = path.strip_prefix('/') else {
        debug!(path, "Path does not start with '/'");
        return Endpoint::not_found();
    };
    let segments: Vec<&str> = rest.split('/').collect();

    let mut current: Option<&'r TypeDefinition<C>> = None;
    let mut referrer: Option<ReferrerLink> = None;
    let mut query: Option<String> = None;
    // Number of segments before the query, if any.
    let mut addressed = segments.len();

    for (i, segment) in segments.iter().copied().enumerate() {
        if is_reserved(segment) {
            query = Some(segments[i..].join("/"));
            addressed = i;
            break;
        }

        if i % 2 == 1 {
            continue;
        }

        let next = match current {
            None => registry.get(segment),
            Some(parent) => parent.relation(segment),
        };
        let Some(next) = next else {
            debug!(path, segment, index = i, "Unknown resource type");
            return Endpoint {
                ty: ResolvedType::NotFound,
                id: None,
                referrer,
                query: None,
            };
        };

        if i > 0 {
            referrer = Some(ReferrerLink::new(
                segments[i - 1],
                segments[i - 2],
                referrer.take(),
            ));
        }
        current = Some(next);
    }

    let Some(definition) = current else {
        // Path began with a reserved segment; there is no type to address.
        debug!(path, "No resource type before query");
        return Endpoint {
            ty: ResolvedType::NotFound,
            id: None,
            referrer: None,
            query,
        };
    };

    let id = (addressed % 2 == 0).then(|| segments[addressed - 1].to_string());
    let depth = referrer.as_ref().map_or(0, ReferrerLink::depth);
    trace!(path, ?id, depth, ?query, "Resolved");

    Endpoint {
        ty: ResolvedType::Resolved(definition),
        id,
        referrer,
        query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{Meta, ResourceType};
    use serde_json::{json, Value};

    fn nested_registry() -> TypeRegistry<()> {
        let comments = TypeDefinition::<()>::new()
            .with_get(|id: String, _: Option<Value>, _: Meta<()>| async move { Ok(json!(id)) });
        let posts = TypeDefinition::<()>::new()
            .with_relation("comments", comments)
            .with_field("likes", |_: Option<String>, _: Meta<()>| async move {
                Ok(json!(0))
            });
        TypeRegistry::new().register(ResourceType::new(
            "users",
            TypeDefinition::new().with_relation("posts", posts),
        ))
    }

    fn is_same<C>(endpoint: &Endpoint<'_, C>, expected: &TypeDefinition<C>) -> bool {
        endpoint
            .ty
            .definition()
            .is_some_and(|found| std::ptr::eq(found, expected))
    }

    #[test]
    fn test_root_collection() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users");

        assert!(is_same(&endpoint, registry.get("users").unwrap()));
        assert_eq!(endpoint.id, None);
        assert_eq!(endpoint.referrer, None);
        assert_eq!(endpoint.query, None);
    }

    #[test]
    fn test_root_entity() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/0b9a");

        assert!(is_same(&endpoint, registry.get("users").unwrap()));
        assert_eq!(endpoint.id.as_deref(), Some("0b9a"));
        assert_eq!(endpoint.referrer, None);
    }

    #[test]
    fn test_unknown_type_in_empty_registry() {
        let registry = TypeRegistry::<()>::new();
        let endpoint = find_type(&registry, "/users/0b9a");

        assert!(!endpoint.ty.is_found());
        assert_eq!(endpoint.id, None);
        assert_eq!(endpoint.referrer, None);
    }

    #[test]
    fn test_nested_route_builds_chain_nearest_first() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/u1/posts/p1/comments/c2");

        let comments = registry
            .get("users")
            .and_then(|users| users.relation("posts"))
            .and_then(|posts| posts.relation("comments"))
            .unwrap();
        assert!(is_same(&endpoint, comments));
        assert_eq!(endpoint.id.as_deref(), Some("c2"));
        assert_eq!(
            endpoint.referrer,
            Some(ReferrerLink::new(
                "p1",
                "posts",
                Some(ReferrerLink::new("u1", "users", None))
            ))
        );
    }

    #[test]
    fn test_unknown_nested_type_stops_chain() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/u1/posts/p1/tags/t1/more/m1");

        assert!(!endpoint.ty.is_found());
        assert_eq!(endpoint.id, None);
        // Links up to the failure point are kept, nothing past it.
        assert_eq!(
            endpoint.referrer,
            Some(ReferrerLink::new("u1", "users", None))
        );
    }

    #[test]
    fn test_field_resolver_is_not_a_relation() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/u1/posts/p1/likes");

        assert!(!endpoint.ty.is_found());
    }

    #[test]
    fn test_query_on_entity_keeps_id() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/u1/actions/ban/invoke");

        assert!(endpoint.ty.is_found());
        assert_eq!(endpoint.id.as_deref(), Some("u1"));
        assert_eq!(endpoint.query.as_deref(), Some("actions/ban/invoke"));
    }

    #[test]
    fn test_query_on_collection() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/actions");

        assert!(endpoint.ty.is_found());
        assert_eq!(endpoint.id, None);
        assert_eq!(endpoint.query.as_deref(), Some("actions"));
    }

    #[test]
    fn test_reserved_keyword_in_id_position() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/u1/posts/fields/likes");

        let posts = registry.get("users").unwrap().relation("posts").unwrap();
        assert!(is_same(&endpoint, posts));
        assert_eq!(endpoint.id, None);
        assert_eq!(endpoint.query.as_deref(), Some("fields/likes"));
        assert_eq!(
            endpoint.referrer,
            Some(ReferrerLink::new("u1", "users", None))
        );
    }

    #[test]
    fn test_reserved_keyword_first_is_not_found() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/actions");

        assert!(!endpoint.ty.is_found());
        assert_eq!(endpoint.query.as_deref(), Some("actions"));
    }

    #[test]
    fn test_path_without_leading_slash() {
        let registry = nested_registry();
        assert!(!find_type(&registry, "users/u1").ty.is_found());
    }

    #[test]
    fn test_trailing_slash_is_empty_id() {
        let registry = nested_registry();
        let endpoint = find_type(&registry, "/users/");

        assert!(endpoint.ty.is_found());
        assert_eq!(endpoint.id.as_deref(), Some(""));
    }
}
