//! # Framework Errors
//!
//! Routing outcomes (404, 405, success) are plain [`Response`](crate::dispatch::Response)
//! values. The types here cover the other case: a user-supplied handler or context
//! builder failed. The dispatcher never maps these to a status code, it hands them
//! back to the transport layer unchanged.

/// Failure reported by a user-supplied handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(Box<dyn std::error::Error + Send + Sync>),
    #[error("Handler failed: {0}")]
    Message(String),
}

impl HandlerError {
    /// Wraps any error type as a handler failure.
    pub fn failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Failed(Box::new(error))
    }
}

impl From<String> for HandlerError {
    fn from(msg: String) -> Self {
        HandlerError::Message(msg)
    }
}

impl From<&str> for HandlerError {
    fn from(msg: &str) -> Self {
        HandlerError::Message(msg.to_string())
    }
}

/// Errors surfaced by [`RestService::handle`](crate::lifecycle::RestService::handle).
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error("Context construction failed: {0}")]
    Context(#[source] HandlerError),
}
