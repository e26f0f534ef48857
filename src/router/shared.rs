//! Atomically replaceable router snapshot.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;
use tracing::info;

use super::Router;

/// A [`Router`] that can be rebuilt while requests are being served.
///
/// Readers call [`load`](SharedRouter::load) per request and keep matching
/// against that snapshot until they drop it; [`replace`](SharedRouter::replace)
/// publishes a new router with a single pointer swap. The live tree is never
/// mutated.
pub struct SharedRouter<H> {
    current: ArcSwap<Router<H>>,
}

impl<H> SharedRouter<H> {
    pub fn new(router: Router<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Lock-free snapshot of the current router.
    #[inline]
    pub fn load(&self) -> Guard<Arc<Router<H>>> {
        self.current.load()
    }

    /// Owned handle on the current router, for long-lived readers.
    pub fn load_full(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Publish `router` and return the one it replaced.
    pub fn replace(&self, router: Router<H>) -> Arc<Router<H>> {
        self.publish(Arc::new(router))
    }

    /// Publish an already shared router and return the one it replaced.
    ///
    /// The caller keeps its own handle on exactly the table it published, even
    /// if another writer swaps again before it looks.
    pub fn publish(&self, router: Arc<Router<H>>) -> Arc<Router<H>> {
        let routes_count = router.routes().len();
        let previous = self.current.swap(router);
        info!(
            routes_count,
            previous_routes_count = previous.routes().len(),
            "Routing table swapped"
        );
        previous
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}
