//! # radixroute
//!
//! **radixroute** is an HTTP request router built on a compressed radix tree.
//! It maps a method and request path to a registered handler, extracting
//! `:param` and trailing `*` captures on the way, and tells "no such path"
//! (404) apart from "path exists, method not registered" (405).
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern parsing, the radix tree, the static index and lookup
//! - **[`manifest`]** - YAML route tables
//! - **[`hot_reload`]** - Rebuild and swap the routing table when a manifest changes
//! - **[`runtime_config`]** - Diagnostic thresholds from the environment or YAML
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`error`]** - Registration and resolution errors
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use radixroute::{MatchKind, Router};
//!
//! let mut router = Router::new();
//! router.add(Method::GET, "/", "index", 0).unwrap();
//! router.add(Method::GET, "/users/:id", "get_user", 1).unwrap();
//! router.add(Method::GET, "/users/:id/files/*", "get_user_file", 2).unwrap();
//!
//! // One buffer serves every request; captures are read back against the path.
//! let mut params = router.new_params();
//! let path = String::from("/users/42/files/a/b.txt");
//! let lookup = router.find(&Method::GET, &path, &mut params);
//! assert_eq!(lookup.handler(), Some(&2));
//! assert_eq!(params.get(&path, "id"), Some("42"));
//! assert_eq!(params.get(&path, "_*"), Some("a/b.txt"));
//!
//! let lookup = router.find(&Method::DELETE, "/users/42", &mut params);
//! assert_eq!(lookup.kind(), MatchKind::MethodNotAllowed);
//! ```
//!
//! ## Matching Rules
//!
//! At every branch the router tries a static segment first, then a `:param`,
//! then a trailing `*`, and backtracks to the next alternative when a branch
//! dead-ends. A `:param` captures one non-empty segment; `*` captures the rest
//! of the path, possibly empty, under the name `_*`.

pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod manifest;
pub mod router;
pub mod runtime_config;

pub use error::{RouterError, RoutingError};
pub use manifest::{ManifestRoute, RouteManifest};
pub use router::{Endpoint, Lookup, MatchKind, Params, RouteMatch, Router, SharedRouter};
pub use runtime_config::RouterConfig;
