//! # Router Module
//!
//! The router module maps an HTTP method and request path to the handler
//! registered for it.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing route patterns (`/users/:id`, `/files/*`) at registration time
//! - Storing routes in a compressed radix tree, with a hash index for literal paths
//! - Matching incoming requests with static > param > wildcard priority
//! - Writing capture offsets into a caller-owned, pre-sized, reusable buffer
//! - Distinguishing "not found" (404) from "method not allowed" (405)
//!
//! ## Architecture
//!
//! 1. **Registration**: [`Router::add`] validates the pattern, then either
//!    stores it in the static index (no captures) or inserts it into the tree,
//!    splitting nodes on shared prefixes so siblings never share a first byte.
//!
//! 2. **Matching**: [`Router::find`] probes the static index, then walks the
//!    tree depth-first, backtracking to the next alternative on a dead end.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use radixroute::router::{MatchKind, Router};
//!
//! let mut router = Router::new();
//! router.add(Method::GET, "/users/:id", "get_user", "get_user_handler").unwrap();
//! router.add(Method::GET, "/files/*", "get_file", "file_handler").unwrap();
//!
//! let mut params = router.new_params();
//! let lookup = router.find(&Method::GET, "/users/123", &mut params);
//! assert_eq!(lookup.kind(), MatchKind::Found);
//! assert_eq!(lookup.handler(), Some(&"get_user_handler"));
//! assert_eq!(params.get("/users/123", "id"), Some("123"));
//!
//! let lookup = router.find(&Method::POST, "/users/123", &mut params);
//! assert_eq!(lookup.kind(), MatchKind::MethodNotAllowed);
//! ```
//!
//! ## Concurrency
//!
//! `add` needs `&mut Router`; `find` needs only `&Router`. Finish registration,
//! then share the router. Use [`SharedRouter`] to publish a rebuilt table while
//! serving.

mod core;
mod endpoint;
mod method;
mod params;
mod pattern;
mod radix;
mod registry;
mod shared;
mod static_index;

pub use self::core::{Lookup, MatchKind, ParamVec, RouteMatch, Router};
pub use endpoint::{Endpoint, RouteEntry};
pub use method::{MethodHandler, MethodKind, METHOD_COUNT};
pub use params::{Params, MAX_INLINE_PARAMS};
pub use pattern::WILDCARD_PARAM;
pub use registry::Route;
pub use shared::SharedRouter;
