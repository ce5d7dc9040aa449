//! # Compiled Pattern Cache
//!
//! Regex and template patterns are compiled lazily and memoized by their
//! source string. The cache is an explicit object owned by a
//! [`Router`](crate::router::Router) rather than ambient global state; several
//! routers may share one by cloning it.
//!
//! ## Thread Safety
//!
//! Both maps are `DashMap`s, so lookups and first-time insertions from many
//! threads never block each other for long and never observe a partially
//! written entry. Two threads missing on the same key both compile; the entry
//! API keeps whichever insertion lands first and both callers get a usable
//! pattern.
//!
//! ## Configuration
//!
//! Caching can be disabled with `ROUTEFLOW_PATTERN_CACHE=off` (see
//! [`RouterConfig`](crate::runtime_config::RouterConfig)); every use then
//! compiles from scratch.

use dashmap::DashMap;
use regex::Regex;
use std::sync::Arc;
use tracing::{error, info, trace};

use super::error::PatternError;
use super::style::Match;
use super::template::Pat;

struct CacheInner {
    templates: DashMap<String, Arc<Pat>>,
    regexes: DashMap<String, Arc<Regex>>,
    enabled: bool,
}

/// Thread-safe cache of compiled patterns, keyed by pattern source.
///
/// ```
/// use routeflow::pattern::PatternCache;
///
/// let cache = PatternCache::new();
/// let pat = cache.templated("/pets/{id}").unwrap();
/// assert!(pat.is_match("/pets/7"));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Clone)]
pub struct PatternCache {
    inner: Arc<CacheInner>,
}

impl PatternCache {
    /// Create an empty, enabled cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// Create a cache that compiles on every call and stores nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::with_enabled(false)
    }

    /// Create an empty cache with caching switched on or off.
    #[must_use]
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                templates: DashMap::new(),
                regexes: DashMap::new(),
                enabled,
            }),
        }
    }

    /// Whether compiled patterns are retained.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    /// Get or compile an OAS-style template.
    pub fn templated(&self, pattern: &str) -> Result<Arc<Pat>, PatternError> {
        self.get_or_compile(&self.inner.templates, Match::Template, pattern, Pat::parse)
    }

    /// Get or compile a regular expression.
    pub fn regex(&self, pattern: &str) -> Result<Arc<Regex>, PatternError> {
        self.get_or_compile(&self.inner.regexes, Match::Regex, pattern, |src| {
            Regex::new(src).map_err(|err| PatternError::Regex {
                pattern: src.to_owned(),
                reason: err.to_string(),
            })
        })
    }

    /// Compile `pattern` ahead of time so that a malformed pattern fails at
    /// startup instead of on the first matching request.
    ///
    /// Exact and prefix patterns need no compilation and always succeed.
    pub fn precompile(&self, style: Match, pattern: &str) -> Result<(), PatternError> {
        if pattern.is_empty() {
            return Ok(());
        }
        match style {
            Match::Exact | Match::Prefix => Ok(()),
            Match::Regex => self.regex(pattern).map(drop),
            Match::Template => self.templated(pattern).map(drop),
        }
    }

    /// Number of cached patterns of all styles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.templates.len() + self.inner.regexes.len()
    }

    /// True if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached pattern.
    pub fn clear(&self) {
        let dropped = self.len();
        self.inner.templates.clear();
        self.inner.regexes.clear();
        info!(dropped = dropped, "Pattern cache cleared");
    }

    fn get_or_compile<T>(
        &self,
        map: &DashMap<String, Arc<T>>,
        style: Match,
        pattern: &str,
        compile: impl FnOnce(&str) -> Result<T, PatternError>,
    ) -> Result<Arc<T>, PatternError> {
        if self.inner.enabled {
            if let Some(hit) = map.get(pattern) {
                trace!(style = %style, pattern = pattern, "Pattern cache hit");
                return Ok(Arc::clone(hit.value()));
            }
        }

        let compiled = match compile(pattern) {
            Ok(compiled) => Arc::new(compiled),
            Err(err) => {
                error!(
                    style = %style,
                    pattern = pattern,
                    error = %err,
                    "Failed to compile pattern"
                );
                return Err(err);
            }
        };

        if !self.inner.enabled {
            return Ok(compiled);
        }

        // Another thread may have inserted while we compiled; keep theirs.
        let entry = map.entry(pattern.to_owned()).or_insert(compiled);
        let stored = Arc::clone(entry.value());
        drop(entry);

        info!(
            style = %style,
            pattern = pattern,
            cache_size = self.len(),
            "Pattern compiled and cached"
        );
        Ok(stored)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("enabled", &self.inner.enabled)
            .field("templates", &self.inner.templates.len())
            .field("regexes", &self.inner.regexes.len())
            .finish()
    }
}
