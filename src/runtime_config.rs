//! # Runtime Configuration Module
//!
//! Router behaviour that can be tuned without recompiling.
//!
//! ## Environment Variables
//!
//! ### `ROUTEFLOW_PATTERN_CACHE`
//!
//! `on` (default) or `off`. With the cache off, regex and template patterns
//! are compiled on every use and never stored. Useful when route tables are
//! generated from unbounded input, at the cost of per-request compilation.
//!
//! ### `ROUTEFLOW_SLOW_ROUTE_US`
//!
//! Routing attempts slower than this many microseconds are logged at `warn`
//! instead of `info`. Default: `1000` (1 ms).
//!
//! Invalid values fall back to the defaults.
//!
//! ## TOML
//!
//! ```toml
//! pattern_cache = true
//! slow_route_threshold_us = 500
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use routeflow::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_toml_str("slow_route_threshold_us = 250").unwrap();
//! assert!(config.pattern_cache);
//! assert_eq!(config.slow_route_threshold().as_micros(), 250);
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

const DEFAULT_SLOW_ROUTE_US: u64 = 1000;

/// Router configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Memoize compiled regex and template patterns (default: true)
    pub pattern_cache: bool,
    /// Slow-attempt warning threshold in microseconds (default: 1000)
    pub slow_route_threshold_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pattern_cache: true,
            slow_route_threshold_us: DEFAULT_SLOW_ROUTE_US,
        }
    }
}

fn parse_switch(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pattern_cache = lookup("ROUTEFLOW_PATTERN_CACHE")
            .and_then(|val| parse_switch(&val))
            .unwrap_or(defaults.pattern_cache);
        let slow_route_threshold_us = lookup("ROUTEFLOW_SLOW_ROUTE_US")
            .and_then(|val| val.trim().parse().ok())
            .unwrap_or(defaults.slow_route_threshold_us);
        Self {
            pattern_cache,
            slow_route_threshold_us,
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        toml::from_str(src).context("Failed to parse router configuration")
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router configuration {}", path.display()))?;
        Self::from_toml_str(&src)
            .with_context(|| format!("Invalid router configuration {}", path.display()))
    }

    #[must_use]
    pub fn slow_route_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_route_threshold_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RouterConfig::from_lookup(lookup(&[]));
        assert_eq!(config, RouterConfig::default());
        assert!(config.pattern_cache);
        assert_eq!(config.slow_route_threshold(), Duration::from_millis(1));
    }

    #[test]
    fn test_env_values() {
        let config = RouterConfig::from_lookup(lookup(&[
            ("ROUTEFLOW_PATTERN_CACHE", "off"),
            ("ROUTEFLOW_SLOW_ROUTE_US", " 250 "),
        ]));
        assert!(!config.pattern_cache);
        assert_eq!(config.slow_route_threshold_us, 250);

        let config = RouterConfig::from_lookup(lookup(&[("ROUTEFLOW_PATTERN_CACHE", "ON")]));
        assert!(config.pattern_cache);
    }

    #[test]
    fn test_invalid_env_values_fall_back() {
        let config = RouterConfig::from_lookup(lookup(&[
            ("ROUTEFLOW_PATTERN_CACHE", "sometimes"),
            ("ROUTEFLOW_SLOW_ROUTE_US", "0x10"),
        ]));
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_toml() {
        let config = RouterConfig::from_toml_str("pattern_cache = false").unwrap();
        assert!(!config.pattern_cache);
        assert_eq!(config.slow_route_threshold_us, DEFAULT_SLOW_ROUTE_US);

        assert_eq!(RouterConfig::from_toml_str("").unwrap(), RouterConfig::default());

        let err = RouterConfig::from_toml_str("pattern_cahce = false").unwrap_err();
        assert!(format!("{err:#}").contains("pattern_cahce"));
    }
}
