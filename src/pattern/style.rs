use serde::{Deserialize, Serialize};
use std::fmt;

use super::cache::PatternCache;
use super::error::PatternError;
use super::template::Captures;

/// Matching style of a route pattern.
///
/// For every style the empty pattern matches any path with zero captures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Match {
    /// `path == pattern`. Never captures.
    #[default]
    #[serde(rename = "exa")]
    Exact,
    /// `path` starts with `pattern` without splitting a path segment, so `/api`
    /// matches `/api` and `/api/x` but not `/apix`. Never captures.
    #[serde(rename = "sta")]
    Prefix,
    /// Regular expression applied as written, without implicit anchors.
    /// Parenthesized groups become captures starting at index 0.
    #[serde(rename = "reg")]
    Regex,
    /// OAS path template, see [`super::Pat`]. Anchored at both ends.
    #[serde(rename = "pat")]
    Template,
}

impl Match {
    /// Short name used in diagnostics: `exa`, `sta`, `reg` or `pat`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Match::Exact => "exa",
            Match::Prefix => "sta",
            Match::Regex => "reg",
            Match::Template => "pat",
        }
    }

    /// True if `pattern` matches `path` under this style.
    ///
    /// Regex and template patterns are compiled through `cache`; a malformed
    /// pattern is reported as an error, never as a non-match.
    pub fn is_match(
        self,
        cache: &PatternCache,
        pattern: &str,
        path: &str,
    ) -> Result<bool, PatternError> {
        if pattern.is_empty() {
            return Ok(true);
        }
        match self {
            Match::Exact => Ok(match_exact(pattern, path)),
            Match::Prefix => Ok(match_prefix(pattern, path)),
            Match::Regex => Ok(cache.regex(pattern)?.is_match(path)),
            Match::Template => Ok(cache.templated(pattern)?.is_match(path)),
        }
    }

    /// Positional captures if `pattern` matches `path`, `None` otherwise.
    ///
    /// Exact and prefix matches always yield empty captures. Regex groups that
    /// did not participate in the match are reported as empty strings.
    pub fn submatch<'i>(
        self,
        cache: &PatternCache,
        pattern: &str,
        path: &'i str,
    ) -> Result<Option<Captures<'i>>, PatternError> {
        if pattern.is_empty() {
            return Ok(Some(Captures::new()));
        }
        match self {
            Match::Exact => Ok(match_exact(pattern, path).then(Captures::new)),
            Match::Prefix => Ok(match_prefix(pattern, path).then(Captures::new)),
            Match::Regex => {
                let re = cache.regex(pattern)?;
                Ok(re.captures(path).map(|caps| {
                    caps.iter()
                        .skip(1)
                        .map(|group| group.map_or("", |m| m.as_str()))
                        .collect()
                }))
            }
            Match::Template => Ok(cache.templated(pattern)?.submatch(path)),
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact comparison; the empty pattern matches anything.
#[inline]
#[must_use]
pub fn match_exact(pattern: &str, path: &str) -> bool {
    pattern.is_empty() || pattern == path
}

/// Segment-aware prefix comparison; the empty pattern matches anything.
#[inline]
#[must_use]
pub fn match_prefix(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    match path.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || pattern.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}
