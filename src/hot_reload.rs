//! # Hot Reload Module
//!
//! Live reloading of a [route manifest](crate::manifest) without restarting
//! the server.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use radixroute::hot_reload::watch_manifest;
//! use radixroute::{Router, RouteManifest, RouterConfig, SharedRouter};
//! use std::sync::Arc;
//!
//! fn resolve(name: &str) -> Option<String> {
//!     Some(name.to_string())
//! }
//!
//! let manifest = RouteManifest::load("routes.yaml")?;
//! let router = Router::from_manifest(&manifest, RouterConfig::default(), resolve)?;
//! let shared = Arc::new(SharedRouter::new(router));
//!
//! // The watcher stops when dropped; keep it for the life of the server.
//! let _watcher = watch_manifest(
//!     "routes.yaml",
//!     Arc::clone(&shared),
//!     RouterConfig::default(),
//!     resolve,
//!     |router| println!("Reloaded {} routes", router.routes().len()),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Reload Process
//!
//! 1. **Detection** - the filesystem watcher reports a modify or create event
//! 2. **Parse** - the manifest is re-read and deserialized
//! 3. **Build** - a complete new [`Router`] is built off to the side
//! 4. **Swap** - [`SharedRouter::publish`] publishes it atomically
//! 5. **Hook** - `on_reload` runs with the new router
//!
//! ## Error Handling
//!
//! If the manifest fails to parse or a route fails to register, the error is
//! logged and the previous router stays live. Requests are never served from
//! a partially built table.

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::manifest::RouteManifest;
use crate::router::{Router, SharedRouter};
use crate::runtime_config::RouterConfig;

/// Rebuild `shared` from the manifest at `path`. Returns the new router, or
/// `None` (after logging) if the manifest could not be loaded or built.
pub fn reload_manifest<H, F>(
    path: &Path,
    shared: &SharedRouter<H>,
    config: RouterConfig,
    resolve: F,
) -> Option<Arc<Router<H>>>
where
    F: FnMut(&str) -> Option<H>,
{
    let manifest = match RouteManifest::load(path) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "hot-reload: manifest load failed, keeping current routes"
            );
            return None;
        }
    };

    match Router::from_manifest(&manifest, config, resolve) {
        Ok(router) => {
            info!(
                path = %path.display(),
                routes_count = router.routes().len(),
                "hot-reload: applying route updates"
            );
            let router = Arc::new(router);
            shared.publish(Arc::clone(&router));
            Some(router)
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "hot-reload: router build failed, keeping current routes"
            );
            None
        }
    }
}

/// Watch a route manifest and rebuild the [`SharedRouter`] when it changes.
///
/// `resolve` maps handler names to handler values on every rebuild.
/// `on_reload` receives each router that was successfully swapped in.
pub fn watch_manifest<P, H, R, F>(
    manifest_path: P,
    shared: Arc<SharedRouter<H>>,
    config: RouterConfig,
    mut resolve: R,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    H: Send + Sync + 'static,
    R: FnMut(&str) -> Option<H> + Send + 'static,
    F: FnMut(&Router<H>) + Send + 'static,
{
    let path: PathBuf = manifest_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    if let Some(router) =
                        reload_manifest(&watch_path, &shared, config, &mut resolve)
                    {
                        on_reload(&router);
                    }
                }
            }
            Err(e) => warn!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "hot-reload: watching route manifest");
    Ok(watcher)
}
