//! # Route Manifest Module
//!
//! Declarative route tables in YAML, so a router can be built (and rebuilt by
//! [`hot_reload`](crate::hot_reload)) from a file instead of code.
//!
//! ```yaml
//! routes:
//!   - method: GET
//!     path: /users/:id
//!     handler: get_user
//!   - method: GET
//!     path: /assets/*
//!     handler: serve_assets
//!     owner: static.example.com
//!     file_server: true
//! ```
//!
//! Handler names are resolved to values by the caller when the router is
//! built, see [`Router::from_manifest`].

use anyhow::{Context, Result};
use http::Method;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::RouterError;
use crate::router::{Endpoint, Router};
use crate::runtime_config::RouterConfig;

/// One route declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestRoute {
    /// HTTP method name; case-insensitive.
    pub method: String,
    pub path: String,
    pub handler: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub file_server: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
}

impl RouteManifest {
    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid manifest.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse route manifest")
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route manifest {}", path.display()))?;
        let manifest = Self::from_yaml_str(&content)
            .with_context(|| format!("invalid route manifest {}", path.display()))?;
        debug!(
            path = %path.display(),
            routes_count = manifest.routes.len(),
            "Route manifest loaded"
        );
        Ok(manifest)
    }
}

impl ManifestRoute {
    fn http_method(&self) -> Result<Method, RouterError> {
        Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| RouterError::InvalidMethod(self.method.clone()))
    }
}

impl<H> Router<H> {
    /// Build a router from `manifest`, turning each handler name into a
    /// handler value with `resolve`.
    ///
    /// Routes are registered in manifest order, so a later entry for the same
    /// method and pattern replaces an earlier one.
    ///
    /// # Errors
    ///
    /// The first route that fails: [`RouterError::InvalidMethod`],
    /// [`RouterError::UnknownHandler`] when `resolve` returns `None`, or any
    /// error from [`Router::add_endpoint`].
    pub fn from_manifest<F>(
        manifest: &RouteManifest,
        config: RouterConfig,
        mut resolve: F,
    ) -> Result<Self, RouterError>
    where
        F: FnMut(&str) -> Option<H>,
    {
        let mut router = Router::with_config(config);
        for route in &manifest.routes {
            let method = route.http_method()?;
            let handler = resolve(&route.handler)
                .ok_or_else(|| RouterError::UnknownHandler(route.handler.clone()))?;

            let mut endpoint =
                Endpoint::new(route.handler.as_str(), handler).with_file_server(route.file_server);
            if let Some(owner) = &route.owner {
                endpoint = endpoint.with_owner(owner.as_str());
            }
            router.add_endpoint(method, &route.path, endpoint)?;
        }
        info!(
            routes_count = router.routes().len(),
            max_params = router.max_params(),
            "Router built from manifest"
        );
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
routes:
  - method: get
    path: /users/:id
    handler: get_user
  - method: POST
    path: /users
    handler: create_user
  - method: GET
    path: /assets/*
    handler: serve_assets
    owner: static.example.com
    file_server: true
"#;

    fn resolve(name: &str) -> Option<&'static str> {
        match name {
            "get_user" => Some("get_user"),
            "create_user" => Some("create_user"),
            "serve_assets" => Some("serve_assets"),
            _ => None,
        }
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = RouteManifest::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(manifest.routes.len(), 3);
        assert!(!manifest.routes[0].file_server);
        assert_eq!(manifest.routes[2].owner.as_deref(), Some("static.example.com"));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = RouteManifest::from_yaml_str("{}").unwrap();
        assert!(manifest.routes.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let err = RouteManifest::from_yaml_str("routes:\n  - method: GET\n    path: /x\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_build_router_from_manifest() {
        let manifest = RouteManifest::from_yaml_str(MANIFEST).unwrap();
        let router = Router::from_manifest(&manifest, RouterConfig::default(), resolve).unwrap();

        assert_eq!(router.routes().len(), 3);
        let m = router.route(&Method::GET, "/users/5").unwrap();
        assert_eq!(m.handler, "get_user");
        assert_eq!(m.get_path_param("id"), Some("5"));

        let m = router.route(&Method::GET, "/assets/img/logo.png").unwrap();
        assert!(m.file_server);
        assert_eq!(m.owner.as_deref(), Some("static.example.com"));
    }

    #[test]
    fn test_unknown_handler() {
        let manifest = RouteManifest::from_yaml_str(
            "routes:\n  - method: GET\n    path: /x\n    handler: nope\n",
        )
        .unwrap();
        let err = Router::from_manifest(&manifest, RouterConfig::default(), resolve).unwrap_err();
        assert_eq!(err, RouterError::UnknownHandler("nope".to_string()));
    }

    #[test]
    fn test_invalid_method() {
        let manifest = RouteManifest::from_yaml_str(
            "routes:\n  - method: \"GE T\"\n    path: /x\n    handler: get_user\n",
        )
        .unwrap();
        let err = Router::from_manifest(&manifest, RouterConfig::default(), resolve).unwrap_err();
        assert_eq!(err, RouterError::InvalidMethod("GE T".to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RouteManifest::load("/definitely/not/here.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read route manifest"));
    }
}
