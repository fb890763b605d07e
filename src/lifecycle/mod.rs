//! Process-level wiring: the [`RestService`] facade and tracing setup.

pub mod service;
pub mod tracing;

pub use service::{ContextBuilder, ContextSource, IncomingRequest, RestService};
pub use tracing::setup_tracing;
