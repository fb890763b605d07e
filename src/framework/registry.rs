//! # Type Registry
//!
//! Maps resource names to their [`TypeDefinition`]. Registration is a pure
//! function: [`TypeRegistry::register`] returns a new registry and leaves the
//! receiver untouched, so an [`Endpoint`](crate::routing::Endpoint) resolved
//! against an older snapshot stays valid while registration continues elsewhere.
//! Definitions are reference counted, which keeps the copy cheap.

use crate::framework::definition::{ResourceType, TypeDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct TypeRegistry<C> {
    types: HashMap<String, Arc<TypeDefinition<C>>>,
}

impl<C> Default for TypeRegistry<C> {
    fn default() -> Self {
        Self {
            types: HashMap::new(),
        }
    }
}

// Derived `Clone` would require `C: Clone`.
impl<C> Clone for TypeRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            types: self.types.clone(),
        }
    }
}

impl<C> TypeRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registry equal to `self` plus `resource`. An existing entry with the
    /// same name is replaced (last write wins).
    pub fn register(&self, resource: ResourceType<C>) -> Self {
        let ResourceType {
            resource_name,
            definition,
        } = resource;
        let mut types = self.types.clone();
        let replaced = types
            .insert(resource_name.clone(), Arc::new(definition))
            .is_some();
        debug!(resource = %resource_name, replaced, size = types.len(), "Registered type");
        Self { types }
    }

    /// The current mapping, for diagnostics.
    pub fn snapshot(&self) -> &HashMap<String, Arc<TypeDefinition<C>>> {
        &self.types
    }

    pub fn get(&self, resource_name: &str) -> Option<&TypeDefinition<C>> {
        self.types.get(resource_name).map(Arc::as_ref)
    }

    pub fn contains(&self, resource_name: &str) -> bool {
        self.types.contains_key(resource_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl<C> std::fmt::Debug for TypeRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.types.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Meta;
    use serde_json::{json, Value};

    fn listable() -> TypeDefinition<()> {
        TypeDefinition::new()
            .with_list(|_: Option<Value>, _: Meta<()>| async move { Ok(json!([])) })
    }

    #[test]
    fn test_register_adds_without_touching_input() {
        let empty = TypeRegistry::<()>::new();
        let users = empty.register(ResourceType::new("users", listable()));

        assert!(empty.is_empty());
        assert_eq!(users.len(), 1);
        assert!(users.contains("users"));
        assert!(users.get("users").unwrap().list.is_some());
    }

    #[test]
    fn test_register_last_write_wins() {
        let registry = TypeRegistry::<()>::new()
            .register(ResourceType::new("users", listable()))
            .register(ResourceType::new("users", TypeDefinition::new()));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("users").unwrap().list.is_none());
    }

    #[test]
    fn test_prior_snapshot_shares_definitions() {
        let first = TypeRegistry::<()>::new().register(ResourceType::new("users", listable()));
        let second = first.register(ResourceType::new("posts", listable()));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(Arc::ptr_eq(
            &first.snapshot()["users"],
            &second.snapshot()["users"]
        ));

        let mut names: Vec<_> = second.resource_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["posts", "users"]);
    }
}
