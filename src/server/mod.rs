//! # Server Module
//!
//! The seams between the router and whatever HTTP stack carries the request.
//!
//! - [`RequestDescriptor`] is what routing reads from a request: method and
//!   path. It is implemented for [`http::Request`] and for the minimal
//!   [`RequestHead`].
//! - [`ResponseSink`] is what handlers write to: a status, headers and body
//!   bytes. [`BufferedResponse`] collects them in memory; [`respond`] copies a
//!   complete [`http::Response`] into any sink and [`write_error`] renders an
//!   error as a plain-text response with the status derived from it.

pub mod request;
pub mod response;

pub use request::{RequestDescriptor, RequestHead};
pub use response::{respond, write_error, BufferedResponse, NopSink, ResponseSink};
