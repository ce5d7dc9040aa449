//! Dry-run introspection.
//!
//! A dry run executes a declaration function without a real request. Every
//! leaf reports an [`Endpoint`] to a [`Visitor`] instead of matching, and
//! sub-routers and method groups always descend. The result is the flat route
//! table the declaration function describes, in declaration order.

use http::Method;
use serde::{Serialize, Serializer};

use crate::pattern::{Match, Pat, PatternError};

/// One leaf found during a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    /// Pattern source, as declared
    pub pattern: String,
    /// Matching style of `pattern`
    pub style: Match,
    /// Declared method, `None` for any method
    #[serde(serialize_with = "serialize_method")]
    pub method: Option<Method>,
    /// Type name of the handler
    pub handler: &'static str,
}

fn serialize_method<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_ref().map_or("", Method::as_str))
}

impl Endpoint {
    fn method_str(&self) -> &str {
        self.method.as_ref().map_or("", Method::as_str)
    }

    /// Regex source matching the same paths as this endpoint.
    ///
    /// Exact patterns become `^pattern$`, prefix patterns get a
    /// segment-boundary suffix, regex patterns are returned unchanged and
    /// templates are rendered with [`Pat::to_regex`]. An empty pattern stays
    /// empty, which matches any path.
    pub fn to_regex(&self) -> Result<String, PatternError> {
        if self.pattern.is_empty() {
            return Ok(String::new());
        }
        let escaped = || regex::escape(&self.pattern);
        Ok(match self.style {
            Match::Exact => format!("^{}$", escaped()),
            Match::Prefix if self.pattern.ends_with('/') => format!("^{}", escaped()),
            Match::Prefix => format!("^{}(?:/|$)", escaped()),
            Match::Regex => self.pattern.clone(),
            Match::Template => Pat::parse(&self.pattern)?.to_regex(),
        })
    }

    /// OAS path template for this endpoint.
    ///
    /// Only exact and templated patterns can be expressed; an exact pattern
    /// containing braces would be read back as a template, so it is rejected
    /// too.
    pub fn to_template(&self) -> Result<String, PatternError> {
        match self.style {
            Match::Template => {
                Pat::parse(&self.pattern)?;
                Ok(self.pattern.clone())
            }
            Match::Exact if !self.pattern.contains(['{', '}']) => Ok(self.pattern.clone()),
            _ => Err(PatternError::NotTemplatable {
                style: self.style,
                pattern: self.pattern.clone(),
                method: self.method_str().to_owned(),
            }),
        }
    }
}

/// Receives endpoints during a dry run.
pub trait Visitor {
    fn endpoint(&mut self, endpoint: Endpoint);
}

impl<F: FnMut(Endpoint)> Visitor for F {
    fn endpoint(&mut self, endpoint: Endpoint) {
        self(endpoint);
    }
}
