//! Ordered record of every registration.
//!
//! Not used for matching. It backs introspection ([`Router::routes`]) and
//! reverse routing ([`Router::reverse`]).
//!
//! [`Router::routes`]: super::Router::routes
//! [`Router::reverse`]: super::Router::reverse

use http::Method;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// One registered (method, pattern) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub pattern: Arc<str>,
    pub handler_name: Arc<str>,
    pub param_names: Arc<[Arc<str>]>,
}

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    /// Append `route`, or replace the existing record for the same method and
    /// pattern in place.
    pub fn record(&mut self, route: Route) {
        match self
            .routes
            .iter_mut()
            .find(|r| r.method == route.method && r.pattern == route.pattern)
        {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
    }

    /// Drop the record for `method` + `pattern`. Used when a different pattern
    /// takes over the same tree slot (e.g. `/users/:id` then `/users/:uid`).
    pub fn remove(&mut self, method: &Method, pattern: &str) {
        self.routes
            .retain(|r| !(r.method == *method && r.pattern.as_ref() == pattern));
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_handler(&self, handler_name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.handler_name.as_ref() == handler_name)
    }
}

/// Build a concrete path from `pattern`, substituting `values` into its
/// `:name` and `*` captures in order.
///
/// Captures without a corresponding value are kept literally; surplus values
/// are ignored.
pub(crate) fn reverse_pattern(pattern: &str, values: &[&str]) -> String {
    let bytes = pattern.as_bytes();
    let mut out = String::with_capacity(pattern.len() + values.iter().map(|v| v.len()).sum::<usize>());
    let mut next = values.iter();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b':' => {
                let end = pattern[i..].find('/').map_or(pattern.len(), |o| i + o);
                match next.next() {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&pattern[i..end]),
                }
                i = end;
            }
            b'*' => {
                match next.next() {
                    Some(value) => out.push_str(value),
                    None => out.push('*'),
                }
                i += 1;
            }
            _ => {
                let end = pattern[i..]
                    .find([':', '*'])
                    .map_or(pattern.len(), |o| i + o);
                out.push_str(&pattern[i..end]);
                i = end;
            }
        }
    }
    out
}
