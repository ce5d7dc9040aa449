use http::Method;

/// Read-only view of an inbound request, as far as routing is concerned.
///
/// Routing only ever looks at the method and the path. Everything else about
/// the request (headers, body, extensions) is left to the handlers, which
/// receive the full request value.
pub trait RequestDescriptor {
    /// HTTP method of the request
    fn method(&self) -> &Method;
    /// URL path without the query string
    fn path(&self) -> &str;
}

impl<B> RequestDescriptor for http::Request<B> {
    fn method(&self) -> &Method {
        http::Request::method(self)
    }

    fn path(&self) -> &str {
        self.uri().path()
    }
}

/// Minimal request descriptor: a method and a path.
///
/// Useful for transports that parse the request line themselves, for dry runs,
/// and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHead {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path, query string excluded
    pub path: String,
}

impl RequestHead {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Build from a raw request target such as `/users?limit=10#top`,
    /// dropping the query string and fragment.
    pub fn from_target(method: Method, target: &str) -> Self {
        let path = target.split(['?', '#']).next().unwrap_or_default();
        Self::new(method, path)
    }
}

impl RequestDescriptor for RequestHead {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }
}
