use std::fmt;

use crate::error::{RouteError, StatusError};
use crate::pattern::PatternError;

/// Early exit from a routing attempt.
///
/// Declaration functions return [`Flow`]. `Ok(())` means "nothing here
/// matched, keep going"; any `Err` stops the attempt and must be propagated
/// with `?` by every enclosing declaration function, so that no sibling
/// statement runs after a match.
#[derive(Debug)]
pub enum Exit {
    /// A leaf matched and its handler ran.
    Handled,
    /// The attempt failed: a routing error, a pattern error, or an
    /// application error raised by a handler or declaration function.
    Failed(anyhow::Error),
}

/// Result of every routing statement.
pub type Flow = Result<(), Exit>;

impl Exit {
    /// Wrap an application error.
    pub fn fail(err: impl Into<anyhow::Error>) -> Self {
        Exit::Failed(err.into())
    }

    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Exit::Handled)
    }

    /// The routing error carried by this exit, if any.
    #[must_use]
    pub fn route_error(&self) -> Option<&RouteError> {
        match self {
            Exit::Handled => None,
            Exit::Failed(err) => err.downcast_ref::<RouteError>(),
        }
    }
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exit::Handled => f.write_str("handled"),
            Exit::Failed(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<anyhow::Error> for Exit {
    fn from(err: anyhow::Error) -> Self {
        Exit::Failed(err)
    }
}

impl From<RouteError> for Exit {
    fn from(err: RouteError) -> Self {
        Exit::Failed(err.into())
    }
}

impl From<StatusError> for Exit {
    fn from(err: StatusError) -> Self {
        Exit::Failed(err.into())
    }
}

impl From<PatternError> for Exit {
    fn from(err: PatternError) -> Self {
        Exit::Failed(err.into())
    }
}
