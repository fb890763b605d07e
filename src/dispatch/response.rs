//! Protocol-agnostic dispatch result, handed to the transport layer as-is.

use http::header::{HeaderValue, ALLOW};
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Response {
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::success(StatusCode::OK, body)
    }

    pub fn success(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    pub fn not_found() -> Self {
        Self::with_status(StatusCode::NOT_FOUND)
    }

    /// 405 with an `Allow` header listing `allowed` in the given order.
    pub fn method_not_allowed<'a>(allowed: impl IntoIterator<Item = &'a Method>) -> Self {
        let allow = allowed
            .into_iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let mut headers = HeaderMap::new();
        // Method names are valid header tokens.
        if let Ok(value) = HeaderValue::from_str(&allow) {
            headers.insert(ALLOW, value);
        }
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            headers,
            body: None,
        }
    }

    /// The `Allow` header, if set.
    pub fn allow(&self) -> Option<&str> {
        self.headers.get(ALLOW).and_then(|v| v.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_header_order() {
        let response = Response::method_not_allowed([&Method::GET, &Method::PUT]);
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.allow(), Some("GET, PUT"));
        assert_eq!(response.body, None);
    }

    #[test]
    fn test_not_found_has_no_headers() {
        let response = Response::not_found();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.headers.is_empty());
        assert_eq!(response.allow(), None);
    }
}
