//! Router core module - hot path for request routing.
//!
//! [`Router::find`] is the allocation-free lookup used by serving layers that
//! own a reusable [`Params`] buffer. [`Router::route`] wraps it for callers
//! that want owned results, logging and timing.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{RouterError, RoutingError};
use crate::runtime_config::RouterConfig;

use super::endpoint::{Endpoint, RouteEntry};
use super::method::{MethodHandler, MethodKind};
use super::params::{Params, MAX_INLINE_PARAMS};
use super::pattern;
use super::radix::{RadixTree, Walk};
use super::registry::{reverse_pattern, Route, RouteRegistry};
use super::static_index::StaticIndex;

/// Owned `(name, value)` parameter storage, inline for ≤8 params.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Outcome class of a lookup. Callers map these to 200 / 404 / 405.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Found,
    NotFound,
    MethodNotAllowed,
}

/// Result of [`Router::find`].
#[derive(Debug)]
pub struct Lookup<'r, H> {
    kind: MatchKind,
    entry: Option<&'r RouteEntry<H>>,
    methods: Option<&'r MethodHandler<RouteEntry<H>>>,
}

impl<'r, H> Lookup<'r, H> {
    fn found(entry: &'r RouteEntry<H>) -> Self {
        Self {
            kind: MatchKind::Found,
            entry: Some(entry),
            methods: None,
        }
    }

    fn not_allowed(methods: &'r MethodHandler<RouteEntry<H>>) -> Self {
        Self {
            kind: MatchKind::MethodNotAllowed,
            entry: None,
            methods: Some(methods),
        }
    }

    fn not_found() -> Self {
        Self {
            kind: MatchKind::NotFound,
            entry: None,
            methods: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.kind == MatchKind::Found
    }

    /// The matched handler, present only for [`MatchKind::Found`].
    #[inline]
    #[must_use]
    pub fn handler(&self) -> Option<&'r H> {
        self.entry.map(|e| &e.endpoint.handler)
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&'r Endpoint<H>> {
        self.entry.map(|e| &e.endpoint)
    }

    /// Pattern of the matched route, e.g. `/users/:id`.
    #[must_use]
    pub fn pattern(&self) -> Option<&'r str> {
        self.entry.map(|e| e.pattern.as_ref())
    }

    /// Capture names of the matched route; empty unless found.
    #[must_use]
    pub fn param_names(&self) -> &'r [Arc<str>] {
        match self.entry {
            Some(entry) => entry.param_names.as_ref(),
            None => &[],
        }
    }

    /// Methods registered on the path, populated for [`MatchKind::MethodNotAllowed`].
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.methods
            .map(|m| m.allowed_methods().collect())
            .unwrap_or_default()
    }
}

/// Owned result of [`Router::route`].
#[derive(Debug, Clone)]
pub struct RouteMatch<H> {
    pub handler: H,
    pub handler_name: Arc<str>,
    pub pattern: Arc<str>,
    /// Path parameters extracted from the URL (e.g. `:id` → `("id", "123")`)
    pub path_params: ParamVec,
    pub owner: Option<Arc<str>>,
    pub file_server: bool,
}

impl<H> RouteMatch<H> {
    /// Get a path parameter by name. A trailing wildcard is named `_*`.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Router that matches HTTP requests to handlers using a radix tree.
///
/// Build it once with [`add`](Router::add), then share it read-only (`&Router`
/// or `Arc<Router>`) with every request thread. To change routes while serving,
/// build a new router and swap it in through [`SharedRouter`](super::SharedRouter).
///
/// Lookup priority at every branch is static segment, then `:param`, then
/// trailing `*`. Literal routes are served from a hash index before the tree
/// is consulted.
#[derive(Debug, Clone)]
pub struct Router<H> {
    tree: RadixTree<H>,
    static_index: StaticIndex<H>,
    registry: RouteRegistry,
    max_params: usize,
    config: RouterConfig,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::with_config(RouterConfig::default())
    }
}

impl<H> Router<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            tree: RadixTree::new(),
            static_index: StaticIndex::default(),
            registry: RouteRegistry::default(),
            max_params: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register `handler` for `method` + `pattern`.
    ///
    /// `pattern` uses `:name` for a single-segment capture and a trailing `*`
    /// for the remainder of the path. Registering the same method and pattern
    /// again replaces the handler.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] for malformed patterns and
    /// [`RouterError::UnsupportedMethod`] for extension methods.
    pub fn add(
        &mut self,
        method: Method,
        pattern: &str,
        handler_name: &str,
        handler: H,
    ) -> Result<(), RouterError> {
        self.add_endpoint(method, pattern, Endpoint::new(handler_name, handler))
    }

    /// Register a fully described [`Endpoint`].
    ///
    /// # Errors
    ///
    /// See [`add`](Router::add).
    pub fn add_endpoint(
        &mut self,
        method: Method,
        pattern: &str,
        endpoint: Endpoint<H>,
    ) -> Result<(), RouterError> {
        let kind = MethodKind::from_method(&method)
            .ok_or_else(|| RouterError::UnsupportedMethod(method.clone()))?;
        let parsed = pattern::parse(pattern)?;

        let route = Route {
            method: method.clone(),
            pattern: Arc::clone(&parsed.pattern),
            handler_name: Arc::clone(&endpoint.handler_name),
            param_names: Arc::clone(&parsed.param_names),
        };
        let entry = RouteEntry {
            endpoint,
            pattern: Arc::clone(&parsed.pattern),
            param_names: Arc::clone(&parsed.param_names),
        };

        let replaced = match parsed.steps.split_last() {
            None => self.static_index.insert(&parsed.pattern, kind, entry),
            Some((terminal, intermediate)) => {
                for step in intermediate {
                    self.tree.insert(&step.path, step.kind, None);
                }
                self.tree
                    .insert(&terminal.path, terminal.kind, Some((kind, entry)))
            }
        };

        if let Some(old) = replaced {
            debug!(
                method = %method,
                pattern = %parsed.pattern,
                previous_pattern = %old.pattern,
                previous_handler = %old.endpoint.handler_name,
                "Route handler replaced"
            );
            if old.pattern != parsed.pattern {
                self.registry.remove(&method, &old.pattern);
            }
        }

        self.max_params = self.max_params.max(parsed.param_names.len());

        debug!(
            method = %method,
            pattern = %parsed.pattern,
            handler_name = %route.handler_name,
            param_count = parsed.param_names.len(),
            static_route = parsed.is_static(),
            "Route registered"
        );
        self.registry.record(route);
        Ok(())
    }

    /// Match `method` + `path`, writing captured values into `params`.
    ///
    /// `params` is cleared first. On [`MatchKind::Found`] it holds one capture
    /// per entry of [`Lookup::param_names`], in the same order; otherwise it is
    /// empty. Captures are offsets into `path`: read them back with the same
    /// path, e.g. `params.get(path, "id")`. No allocation happens as long as
    /// `params` was sized with [`new_params`](Router::new_params) after
    /// registration finished, and the buffer can be reused for every request.
    pub fn find<'r>(&'r self, method: &Method, path: &str, params: &mut Params) -> Lookup<'r, H> {
        params.clear();
        let path = if path.is_empty() { "/" } else { path };
        let kind = MethodKind::from_method(method);

        if let Some(handlers) = self.static_index.get(path) {
            return match kind.and_then(|k| handlers.find_handler(k)) {
                Some(entry) => {
                    params.set_names(&entry.param_names);
                    Lookup::found(entry)
                }
                None => Lookup::not_allowed(handlers),
            };
        }

        match self.tree.find(kind, path, params) {
            Walk::Found(entry) => {
                params.set_names(&entry.param_names);
                Lookup::found(entry)
            }
            Walk::MethodNotAllowed(handlers) => Lookup::not_allowed(handlers),
            Walk::NotFound => Lookup::not_found(),
        }
    }

    /// Largest number of captures any registered route produces. Size
    /// per-request parameter buffers from this before serving starts.
    #[inline]
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// A parameter buffer large enough for every registered route.
    #[must_use]
    pub fn new_params(&self) -> Params {
        Params::with_capacity(self.max_params)
    }

    /// Every registration in order, for introspection and URL building.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        self.registry.routes()
    }

    /// Build a URL for the route registered under `handler_name`, filling its
    /// captures with `values` in order.
    ///
    /// ```rust
    /// use http::Method;
    /// use radixroute::Router;
    ///
    /// let mut router = Router::new();
    /// router.add(Method::GET, "/users/:id/posts/:post", "get_post", ()).unwrap();
    /// assert_eq!(
    ///     router.reverse("get_post", &["7", "99"]).as_deref(),
    ///     Some("/users/7/posts/99")
    /// );
    /// ```
    #[must_use]
    pub fn reverse(&self, handler_name: &str, values: &[&str]) -> Option<String> {
        self.registry
            .by_handler(handler_name)
            .map(|route| reverse_pattern(&route.pattern, values))
    }

    /// Log all registered routes at INFO.
    pub fn dump_routes(&self) {
        info!(
            routes_count = self.registry.routes().len(),
            static_routes = self.static_index.len(),
            tree_nodes = self.tree.len(),
            max_params = self.max_params,
            "Routing table"
        );
        for route in self.registry.routes() {
            info!(
                method = %route.method,
                pattern = %route.pattern,
                handler_name = %route.handler_name,
                "Route"
            );
        }
    }

    /// Indented rendering of the radix tree, for debugging.
    #[must_use]
    pub fn render_tree(&self) -> String {
        self.tree.render()
    }

    #[cfg(test)]
    pub(crate) fn tree_labels_are_unique(&self) -> bool {
        self.tree.labels_are_unique()
    }
}

impl<H: Clone> Router<H> {
    /// Resolve a request to an owned [`RouteMatch`], logging the outcome.
    ///
    /// # Errors
    ///
    /// [`RoutingError::NotFound`] or [`RoutingError::MethodNotAllowed`].
    pub fn route(&self, method: &Method, path: &str) -> Result<RouteMatch<H>, RoutingError> {
        let match_start = std::time::Instant::now();
        let mut params = self.new_params();
        let lookup = self.find(method, path, &mut params);
        let match_duration = match_start.elapsed();

        if match_duration > self.config.slow_match_threshold() {
            warn!(
                method = %method,
                path = %path,
                outcome = ?lookup.kind(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        }

        match lookup.kind() {
            MatchKind::Found => {
                let entry = lookup
                    .entry
                    .ok_or_else(|| RoutingError::NotFound {
                        method: method.clone(),
                        path: path.to_owned(),
                    })?;
                let path_params: ParamVec = entry
                    .param_names
                    .iter()
                    .zip(params.values(path))
                    .map(|(name, value)| (Arc::clone(name), value.to_owned()))
                    .collect();

                if self.config.log_matches {
                    debug!(
                        method = %method,
                        path = %path,
                        handler_name = %entry.endpoint.handler_name,
                        route_pattern = %entry.pattern,
                        path_params = ?path_params,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }

                Ok(RouteMatch {
                    handler: entry.endpoint.handler.clone(),
                    handler_name: Arc::clone(&entry.endpoint.handler_name),
                    pattern: Arc::clone(&entry.pattern),
                    path_params,
                    owner: entry.endpoint.owner.clone(),
                    file_server: entry.endpoint.file_server,
                })
            }
            MatchKind::MethodNotAllowed => {
                let allowed = lookup.allowed_methods();
                if self.config.log_matches {
                    debug!(
                        method = %method,
                        path = %path,
                        allowed = ?allowed,
                        "Method not allowed"
                    );
                }
                Err(RoutingError::MethodNotAllowed {
                    method: method.clone(),
                    path: path.to_owned(),
                    allowed,
                })
            }
            MatchKind::NotFound => {
                if self.config.log_matches {
                    debug!(method = %method, path = %path, "No route matched");
                }
                Err(RoutingError::NotFound {
                    method: method.clone(),
                    path: path.to_owned(),
                })
            }
        }
    }
}
