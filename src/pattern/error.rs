use std::fmt;

use super::style::Match;

/// Pattern compilation error
///
/// Raised when a templated or regex pattern cannot be compiled. This is a
/// construction-time failure: it is never produced by a successful parse, and
/// it is never swallowed by the router. Whoever triggers compilation receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// `?` or `#` appeared in an OAS-style template
    UnexpectedChar {
        /// The offending pattern source
        pattern: String,
        /// The disallowed character
        found: char,
    },
    /// A `}` without a matching `{`
    UnbalancedClose {
        /// The offending pattern source
        pattern: String,
    },
    /// `{` or `/` inside a template expression
    InsideTemplate {
        /// The offending pattern source
        pattern: String,
        /// The disallowed character
        found: char,
    },
    /// A `{` that was never closed
    Unclosed {
        /// The offending pattern source
        pattern: String,
    },
    /// More template expressions than the capture ceiling allows
    TooManyCaptures {
        /// The offending pattern source
        pattern: String,
        /// Number of template expressions seen so far
        found: usize,
        /// The ceiling
        limit: usize,
    },
    /// The regex engine rejected the pattern
    Regex {
        /// The offending pattern source
        pattern: String,
        /// Message from the regex engine
        reason: String,
    },
    /// An endpoint can't be expressed as an OAS template
    NotTemplatable {
        /// Style of the endpoint
        style: Match,
        /// Pattern of the endpoint
        pattern: String,
        /// Method of the endpoint, empty for any method
        method: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnexpectedChar { pattern, found } => write!(
                f,
                "invalid OAS-style pattern {pattern:?}: unexpected {found:?}"
            ),
            PatternError::UnbalancedClose { pattern } => write!(
                f,
                "invalid OAS-style pattern {pattern:?}: unexpected '}}' outside of template expression"
            ),
            PatternError::InsideTemplate { pattern, found } => write!(
                f,
                "invalid OAS-style pattern {pattern:?}: unexpected {found:?} in the middle of a template expression"
            ),
            PatternError::Unclosed { pattern } => write!(
                f,
                "invalid OAS-style pattern {pattern:?}: unclosed template expression"
            ),
            PatternError::TooManyCaptures {
                pattern,
                found,
                limit,
            } => write!(
                f,
                "invalid OAS-style pattern {pattern:?}: found {found} template expressions which exceeds limit {limit}"
            ),
            PatternError::Regex { pattern, reason } => {
                write!(f, "invalid regex pattern {pattern:?}: {reason}")
            }
            PatternError::NotTemplatable {
                style,
                pattern,
                method,
            } => write!(
                f,
                "unable to convert match \"{style}\" for route {pattern:?} {method:?} to OAS pattern"
            ),
        }
    }
}

impl std::error::Error for PatternError {}
