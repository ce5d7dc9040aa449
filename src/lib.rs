//! # routeflow
//!
//! **routeflow** is an imperative request router for Rust HTTP servers. Routes are not
//! registered in a table; they are statements in an ordinary function that is run for
//! every request. The first statement that matches handles the request and the `?`
//! operator unwinds the rest.
//!
//! ## Overview
//!
//! Routing needs two things from the surrounding server: a request that exposes its
//! method and path ([`server::RequestDescriptor`]) and somewhere to write the response
//! ([`server::ResponseSink`]). Everything else about the request is the handler's
//! business.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Exact, prefix, regex and OAS-templated path patterns, plus the
//!   compiled-pattern cache
//! - **[`method`]** - HTTP method matching
//! - **[`router`]** - The route cursor, the early-exit protocol, sub-routers, method
//!   groups and dry-run introspection
//! - **[`error`]** - Routing errors and status extraction from wrapped error chains
//! - **[`server`]** - Request and response seams
//! - **[`runtime_config`]** - Router settings from the environment or TOML
//! - **[`logging`]** - Optional `tracing` subscriber bootstrap
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server
//!     participant Router
//!     participant Fun as Declaration fn
//!     participant Handler
//!
//!     Server->>Router: route(req, sink, fun)
//!     Router->>Fun: fun(&root cursor)
//!     loop each statement
//!         Fun->>Fun: pattern + method test
//!         alt path and method match
//!             Fun->>Handler: handler(req, sink)
//!             Handler-->>Fun: done
//!             Fun-->>Router: Err(Exit::Handled)
//!         else path matches, method doesn't (strict)
//!             Fun-->>Router: Err(405)
//!         else no match
//!             Fun->>Fun: next statement
//!         end
//!     end
//!     Fun-->>Router: Ok(()) means 404
//!     Router-->>Server: Result
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::{Method, Request, Response, StatusCode};
//! use routeflow::router::{Flow, Rou, Router};
//! use routeflow::server::BufferedResponse;
//!
//! fn routes(r: &Rou<'_, Request<()>>) -> Flow {
//!     r.exa("/health").get().res(|_| Response::new("ok"))?;
//!     r.pat("/pets/{id}").methods(|r| {
//!         r.get().param_res(|_, args| Response::new(format!("pet {}", args[0])))?;
//!         r.delete().res(|_| {
//!             Response::builder()
//!                 .status(StatusCode::NO_CONTENT)
//!                 .body(Vec::new())
//!                 .unwrap_or_default()
//!         })
//!     })
//! }
//!
//! let router = Router::new();
//! let req = Request::builder().uri("/pets/12?full=1").body(()).unwrap();
//! let mut res = BufferedResponse::new();
//! router.serve(&req, &mut res, routes);
//! assert_eq!(res.status, StatusCode::OK);
//! assert_eq!(res.text(), "pet 12");
//!
//! let req = Request::builder().method(Method::POST).uri("/pets/12").body(()).unwrap();
//! let mut res = BufferedResponse::new();
//! router.serve(&req, &mut res, routes);
//! assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
//! ```
//!
//! ## Features
//!
//! - **No route table**: routes are code, so conditions, loops and helper functions
//!   compose naturally
//! - **Correct 404/405**: a path match with the wrong method is `405`, not `404`
//! - **OAS templates**: `/pets/{id}` patterns with zero-allocation captures
//! - **Introspection**: [`router::Router::endpoints`] lists every declared route without
//!   a request, and can render them as regex or OAS templates
//! - **Status-aware errors**: handlers can fail with any error; its HTTP status is found
//!   through arbitrarily wrapped error chains
//!
//! ## Configuration
//!
//! ```bash
//! ROUTEFLOW_PATTERN_CACHE=off      # compile regex/template patterns on every use
//! ROUTEFLOW_SLOW_ROUTE_US=500      # warn about routing attempts slower than this
//! ROUTEFLOW_LOG_FORMAT=pretty      # when using logging::init_logging_with_config
//! ```

pub mod error;
pub mod logging;
pub mod method;
pub mod pattern;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use error::{anyhow_status, error_status, HttpStatus, RouteError, StatusError};
pub use pattern::{Match, Pat, PatternCache, PatternError};
pub use router::{Endpoint, Exit, Flow, Mode, Rou, Router, Visitor};
pub use runtime_config::RouterConfig;
pub use server::{BufferedResponse, RequestDescriptor, RequestHead, ResponseSink};
