//! # REST Dispatch
//!
//! > **Resource addressing and request dispatch for hierarchical REST APIs.**
//!
//! Resource types are registered once with their handlers. Afterwards any path such as
//! `/users/u1/posts/p7/actions/publish/invoke` is resolved to a type, an optional entity
//! id, the chain of ancestors it was reached through, and an optional query tail. The
//! request is then routed to the right handler, or answered with 404/405.
//!
//! The crate is transport-neutral: it consumes a method, a path and a JSON body, and
//! produces a [`Response`](dispatch::Response). Plugging it into an HTTP server is the
//! caller's job.
//!
//! ## Core Concepts
//!
//! ### Paths alternate type and id
//! Even segments name a type (a registered root, then a relation of the previous type),
//! odd segments are entity ids. An odd-length path addresses a collection, an even-length
//! path an entity. The first `actions` or `fields` segment ends the walk; it and
//! everything after it form the query.
//!
//! ### Referrers
//! Every handler receives a [`Meta`](framework::Meta) holding the request context and a
//! [`ReferrerLink`](routing::ReferrerLink) chain, nearest ancestor first. For
//! `/users/u1/posts/p7` the `posts` handler sees `users/u1`.
//!
//! ### Context is generic
//! `TypeRegistry<C>`, `RestService<C>` and every handler trait are generic over the
//! context type `C`. The dispatcher never looks inside it; it is shared as `Arc<C>`.
//!
//! ## Architecture Notes
//!
//! ### 1. Copy-on-write registry
//! [`TypeRegistry::register`](framework::TypeRegistry::register) returns a new registry.
//! [`RestService`](lifecycle::RestService) publishes it through a `watch` channel, and
//! each request holds the snapshot it started with.
//!
//! ### 2. Errors flow outward
//! Routing decisions (404, 405) are ordinary responses. Handler failures come back as
//! [`HandlerError`](framework::HandlerError), wrapped in
//! [`RestError`](framework::RestError) at the service boundary, and are never turned
//! into a status code here.
//!
//! ### 3. Observability
//! `tracing` is used throughout; [`RestService::handle`](lifecycle::RestService::handle)
//! opens a span per request. See the [`lifecycle::tracing`] module for details.
//!
//! ## Module Tour
//!
//! ### 1. The Model ([`framework`])
//! - **Role**: Type definitions, handler traits, the registry and error types.
//! - **Key items**: [`TypeDefinition`](framework::TypeDefinition),
//!   [`TypeRegistry`](framework::TypeRegistry), [`Action`](framework::Action).
//!
//! ### 2. The Resolver ([`routing`])
//! - **Role**: Turns a path into an [`Endpoint`](routing::Endpoint).
//! - **Key items**: [`find_type`](routing::find_type), [`ReferrerLink`](routing::ReferrerLink).
//!
//! ### 3. The Dispatcher ([`dispatch`])
//! - **Role**: Method tables for CRUD, plus the `actions` and `fields` sub-routers.
//! - **Key items**: [`handle_request`](dispatch::handle_request),
//!   [`handle_query_request`](dispatch::handle_query_request).
//!
//! ### 4. The Facade ([`lifecycle`])
//! - **Role**: Owns the registry, builds per-request context, sets up tracing.
//! - **Key items**: [`RestService`](lifecycle::RestService).
//!
//! ### 5. Testing ([`mock`])
//! - **Role**: [`MockHandler`](mock::MockHandler) records calls and replays canned results.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! cargo test
//! ```

pub mod dispatch;
pub mod framework;
pub mod lifecycle;
pub mod mock;
pub mod routing;
