//! Resource type model: definitions, handler seams and the type registry.
//!
//! # Main Components
//!
//! - [`TypeDefinition`] - A resource's capability set (CRUD handlers, relations, fields, actions)
//! - [`TypeRegistry`] - Copy-on-write map from resource name to definition
//! - [`CollectionHandler`], [`EntityHandler`], [`ActionInvoker`], [`FieldResolver`] - Handler traits
//! - [`HandlerError`], [`RestError`] - Failure types propagated to the transport layer

pub mod definition;
pub mod error;
pub mod handler;
pub mod registry;

// Re-export core types for convenience
pub use definition::{Action, OutboundField, ResourceType, TypeDefinition};
pub use error::{HandlerError, RestError};
pub use handler::{
    ActionInvoker, CollectionHandler, EntityHandler, FieldResolver, HandlerResult, Meta,
};
pub use registry::TypeRegistry;
