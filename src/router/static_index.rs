//! Exact-match index for routes without parameters.
//!
//! Literal patterns never enter the radix tree. A request path is looked up
//! here first and, on a hit, the tree is not consulted at all: the literal
//! route shadows any param or wildcard route that would also match the same
//! string.

use std::collections::HashMap;

use super::endpoint::RouteEntry;
use super::method::{MethodHandler, MethodKind};

#[derive(Debug, Clone)]
pub(crate) struct StaticIndex<H> {
    routes: HashMap<Box<str>, MethodHandler<RouteEntry<H>>>,
}

impl<H> Default for StaticIndex<H> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }
}

impl<H> StaticIndex<H> {
    /// Register `entry` for `method` on `path`, merging with the methods
    /// already known for that path. Returns the entry it replaced.
    pub fn insert(
        &mut self,
        path: &str,
        method: MethodKind,
        entry: RouteEntry<H>,
    ) -> Option<RouteEntry<H>> {
        match self.routes.get_mut(path) {
            Some(handlers) => handlers.add_handler(method, entry),
            None => {
                let mut handlers = MethodHandler::new();
                handlers.add_handler(method, entry);
                self.routes.insert(Box::from(path), handlers);
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, path: &str) -> Option<&MethodHandler<RouteEntry<H>>> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}
