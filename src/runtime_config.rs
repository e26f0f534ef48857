//! # Runtime Configuration Module
//!
//! Tunables for the router's diagnostics. Matching behaviour itself is not
//! configurable: priority order and pattern validation are fixed.
//!
//! ## Environment Variables
//!
//! ### `RADIXROUTE_SLOW_MATCH_US`
//!
//! Threshold in microseconds above which [`Router::route`] logs a
//! "Slow route matching detected" warning. Accepts decimal (`1000`) or
//! hexadecimal (`0x3e8`). Default: `1000` (1 ms).
//!
//! ### `RADIXROUTE_LOG_MATCHES`
//!
//! `true`/`false`. When enabled every resolution emits a DEBUG event with the
//! matched pattern and parameters. Default: `true`.
//!
//! ## Usage
//!
//! ```rust
//! use radixroute::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("Slow match threshold: {} us", config.slow_match_threshold_us);
//! ```
//!
//! The same settings can be read from YAML, e.g. a `router:` section of a
//! service config file:
//!
//! ```yaml
//! slow_match_threshold_us: 250
//! log_matches: false
//! ```
//!
//! [`Router::route`]: crate::router::Router::route

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Router configuration loaded from the environment or a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Resolutions slower than this are logged at WARN (default: 1000 µs)
    pub slow_match_threshold_us: u64,
    /// Emit a DEBUG event per resolution (default: true)
    pub log_matches: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold_us: DEFAULT_SLOW_MATCH_US,
            log_matches: true,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through `var`, a lookup shaped like [`env::var`].
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let slow_match_threshold_us = match var("RADIXROUTE_SLOW_MATCH_US") {
            Some(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    u64::from_str_radix(hex, 16).unwrap_or(DEFAULT_SLOW_MATCH_US)
                } else {
                    val.parse().unwrap_or(DEFAULT_SLOW_MATCH_US)
                }
            }
            None => DEFAULT_SLOW_MATCH_US,
        };
        let log_matches = var("RADIXROUTE_LOG_MATCHES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);
        RouterConfig {
            slow_match_threshold_us,
            log_matches,
        }
    }

    /// Parse configuration from a YAML document; missing keys take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse router configuration")
    }

    #[must_use]
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_threshold_us)
    }
}
