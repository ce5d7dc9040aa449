use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use std::io;
use tracing::warn;

use crate::error::anyhow_status_or_500;

/// Outbound side of a request, written to by handlers.
///
/// The router never writes to a sink on its own. Only [`respond`] and
/// [`write_error`] do, when the application asks for it.
pub trait ResponseSink {
    /// Set the response status. Sinks start out at `200 OK`.
    fn write_status(&mut self, status: StatusCode);
    /// Append a header.
    fn write_header(&mut self, name: HeaderName, value: HeaderValue);
    /// Append body bytes.
    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// In-memory response, convertible into `http::Response<Vec<u8>>`.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[must_use]
    pub fn into_response(self) -> http::Response<Vec<u8>> {
        let mut res = http::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BufferedResponse> for http::Response<Vec<u8>> {
    fn from(buf: BufferedResponse) -> Self {
        buf.into_response()
    }
}

impl ResponseSink for BufferedResponse {
    fn write_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn write_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

/// Sink that discards everything. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopSink;

impl ResponseSink for NopSink {
    fn write_status(&mut self, _status: StatusCode) {}

    fn write_header(&mut self, _name: HeaderName, _value: HeaderValue) {}

    fn write_body(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

/// Copy a prepared response into `sink`.
///
/// Headers are appended in order. The status is written only when it differs
/// from `200 OK`, matching sinks that default to 200 and treat an explicit
/// status write as final.
pub fn respond<B: AsRef<[u8]>>(
    sink: &mut dyn ResponseSink,
    res: http::Response<B>,
) -> io::Result<()> {
    let (parts, body) = res.into_parts();

    let mut current = None;
    for (name, value) in parts.headers {
        // `HeaderMap::into_iter` yields the name only for the first value.
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(name) = &current {
            sink.write_header(name.clone(), value);
        }
    }

    if parts.status != StatusCode::OK {
        sink.write_status(parts.status);
    }

    let bytes = body.as_ref();
    if bytes.is_empty() {
        return Ok(());
    }
    sink.write_body(bytes)
}

/// Render a routing or application error as a plain-text response.
///
/// The status is recovered from the error chain, falling back to 500; the body
/// is the error message. Body write failures are logged, not returned, since
/// there is nothing further the caller could send.
pub fn write_error(sink: &mut dyn ResponseSink, err: &anyhow::Error) {
    let status = anyhow_status_or_500(err);
    sink.write_status(status);
    sink.write_header(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Err(io_err) = sink.write_body(err.to_string().as_bytes()) {
        warn!(
            status = status.as_u16(),
            error = %io_err,
            "Failed to write error response body"
        );
    }
}
