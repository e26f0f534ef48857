//! Error types for route registration and resolution.

use http::{Method, StatusCode};
use thiserror::Error;

/// Failure to register a route. Raised at startup, never on the request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("method {0} cannot be routed")]
    UnsupportedMethod(Method),

    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),

    #[error("no handler registered under `{0}`")]
    UnknownHandler(String),
}

/// A request that could not be routed. Carries enough to build the 404/405
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no route for {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("{method} not allowed for {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        /// Methods the path does accept, for the `Allow` header.
        allowed: Vec<Method>,
    },
}

impl RoutingError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            RoutingError::NotFound { .. } => StatusCode::NOT_FOUND,
            RoutingError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Value for the `Allow` response header; `None` for a 404.
    #[must_use]
    pub fn allow_header(&self) -> Option<String> {
        match self {
            RoutingError::NotFound { .. } => None,
            RoutingError::MethodNotAllowed { allowed, .. } => Some(
                allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }
}
