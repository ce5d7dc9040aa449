//! # Routing Errors and Status Extraction
//!
//! Two outcomes are produced by the router itself:
//!
//! - [`RouteError::NotFound`] (404): no declaration matched the path
//! - [`RouteError::MethodNotAllowed`] (405): a declaration matched the path
//!   but not the method
//!
//! Application code that wants its own failures to carry a status uses
//! [`StatusError`], which wraps any error together with an explicit code.
//!
//! [`error_status`] and [`anyhow_status`] find that code again, however deep
//! the error was wrapped, by walking the `source()` chain. The walk is bounded
//! and stops with `None` on a cycle, so an error whose source is itself cannot
//! hang the boundary layer.

use http::{Method, StatusCode};
use smallvec::SmallVec;
use std::error::Error;
use std::fmt;

/// Longest `source()` chain inspected by [`error_status`].
pub const MAX_SOURCE_DEPTH: usize = 64;

/// An error that maps onto an HTTP status code.
///
/// [`error_status`] only recognises the two library types in a chain,
/// [`RouteError`] and [`StatusError`]. An application error implementing this
/// trait is not found on its own; wrap it with
/// [`StatusError::from_http_status`] before returning it from a handler.
///
/// ```
/// use http::StatusCode;
/// use routeflow::{error_status, HttpStatus, StatusError};
///
/// #[derive(Debug)]
/// struct Duplicate;
///
/// impl std::fmt::Display for Duplicate {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("duplicate")
///     }
/// }
///
/// impl std::error::Error for Duplicate {}
///
/// impl HttpStatus for Duplicate {
///     fn http_status(&self) -> StatusCode {
///         StatusCode::CONFLICT
///     }
/// }
///
/// assert_eq!(error_status(&Duplicate), None);
/// let err = StatusError::from_http_status(Duplicate);
/// assert_eq!(error_status(&err), Some(StatusCode::CONFLICT));
/// ```
pub trait HttpStatus {
    /// The status a boundary layer should respond with.
    fn http_status(&self) -> StatusCode;
}

/// Routing failure produced by [`Router::route`](crate::router::Router::route).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No route matched the path
    NotFound {
        /// Request method
        method: Method,
        /// Request path
        path: String,
    },
    /// A route matched the path, none matched the method
    MethodNotAllowed {
        /// Request method
        method: Method,
        /// Request path
        path: String,
    },
}

impl RouteError {
    pub fn not_found(method: &Method, path: &str) -> Self {
        RouteError::NotFound {
            method: method.clone(),
            path: path.to_owned(),
        }
    }

    pub fn method_not_allowed(method: &Method, path: &str) -> Self {
        RouteError::MethodNotAllowed {
            method: method.clone(),
            path: path.to_owned(),
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        match self {
            RouteError::NotFound { method, .. } | RouteError::MethodNotAllowed { method, .. } => {
                method
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            RouteError::NotFound { path, .. } | RouteError::MethodNotAllowed { path, .. } => path,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            RouteError::NotFound { .. } => "no such endpoint",
            RouteError::MethodNotAllowed { .. } => "method not allowed",
        }
    }
}

impl HttpStatus for RouteError {
    fn http_status(&self) -> StatusCode {
        match self {
            RouteError::NotFound { .. } => StatusCode::NOT_FOUND,
            RouteError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "routing error (HTTP status {}): {}: \"{}\" \"{}\"",
            self.http_status().as_u16(),
            self.reason(),
            self.method(),
            self.path()
        )
    }
}

impl Error for RouteError {}

/// Any error paired with an explicit HTTP status.
///
/// Displays as its cause and exposes the cause through `source()`, so it can
/// wrap errors of any depth without hiding them.
///
/// ```
/// use http::StatusCode;
/// use routeflow::error::{anyhow_status, StatusError};
///
/// let err = anyhow::Error::new(StatusError::new(StatusCode::CONFLICT, "already exists"))
///     .context("creating article");
/// assert_eq!(anyhow_status(&err), Some(StatusCode::CONFLICT));
/// ```
#[derive(Debug)]
pub struct StatusError {
    status: StatusCode,
    source: Box<dyn Error + Send + Sync + 'static>,
}

impl StatusError {
    pub fn new(status: StatusCode, source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self {
            status,
            source: source.into(),
        }
    }

    /// Wrap `err` with the status it reports for itself.
    pub fn from_http_status<E>(err: E) -> Self
    where
        E: HttpStatus + Error + Send + Sync + 'static,
    {
        Self::new(err.http_status(), err)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The wrapped cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.source
    }
}

impl HttpStatus for StatusError {
    fn http_status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl Error for StatusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}

fn own_status(err: &(dyn Error + 'static)) -> Option<StatusCode> {
    if let Some(err) = err.downcast_ref::<RouteError>() {
        return Some(err.http_status());
    }
    if let Some(err) = err.downcast_ref::<StatusError>() {
        return Some(err.http_status());
    }
    None
}

/// Identity of one element in a `source()` chain.
///
/// The whole fat pointer is kept: a wrapper and an error stored inline at
/// offset zero share a data address but not a vtable.
type ChainKey = *const (dyn Error + 'static);

fn seen_before(seen: &[ChainKey], key: ChainKey) -> bool {
    seen.iter().any(|&prev| std::ptr::eq(prev, key))
}

/// First status code found while walking `err` and its sources.
///
/// Returns `None` if no element carries a status, if the chain loops back to
/// an element already visited, or if it is longer than [`MAX_SOURCE_DEPTH`].
#[must_use]
pub fn error_status(err: &(dyn Error + 'static)) -> Option<StatusCode> {
    let mut seen: SmallVec<[ChainKey; 8]> = SmallVec::new();
    let mut cur = Some(err);

    while let Some(err) = cur {
        let key: ChainKey = err;
        if seen_before(&seen, key) || seen.len() >= MAX_SOURCE_DEPTH {
            return None;
        }
        seen.push(key);

        if let Some(status) = own_status(err) {
            return Some(status);
        }
        cur = err.source();
    }
    None
}

/// [`error_status`] for an `anyhow::Error`, including its context layers.
#[must_use]
pub fn anyhow_status(err: &anyhow::Error) -> Option<StatusCode> {
    let root: &(dyn Error + 'static) = err.as_ref();
    error_status(root)
}

/// [`error_status`], falling back to `500 Internal Server Error`.
#[must_use]
pub fn error_status_or_500(err: &(dyn Error + 'static)) -> StatusCode {
    error_status(err).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// [`anyhow_status`], falling back to `500 Internal Server Error`.
#[must_use]
pub fn anyhow_status_or_500(err: &anyhow::Error) -> StatusCode {
    anyhow_status(err).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
