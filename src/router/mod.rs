//! # Router Module
//!
//! Imperative request routing. There is no route table: a declaration
//! function is ordinary code that receives a root cursor, [`Rou`], and tries
//! one route after another. The first route that matches handles the
//! request, and the `?` operator carries that outcome out of every enclosing
//! function so that nothing after it runs.
//!
//! ## Protocol
//!
//! Every routing statement returns [`Flow`]:
//!
//! | Result | Meaning |
//! |---|---|
//! | `Ok(())` | not matched, try the next statement |
//! | `Err(Exit::Handled)` | a handler ran, stop |
//! | `Err(Exit::Failed(e))` | routing error, pattern error or application error, stop |
//!
//! [`Router::route`] converts the final outcome: handled becomes `Ok(())`,
//! falling off the end becomes `404 Not Found`, failures are returned as-is.
//!
//! ## Strict and Lax
//!
//! By default a route whose path matches but whose method doesn't ends the
//! attempt with `405 Method Not Allowed`. Inside [`Rou::methods`] cursors are
//! lax and such a mismatch just moves on to the next method; `405` is raised
//! once the group is exhausted.
//!
//! ## Sub-routing
//!
//! [`Rou::sub`] runs a nested declaration function when its own criteria
//! match. A sub-router that matches but handles nothing ends the attempt with
//! `404`; routes declared after it are not tried.
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use routeflow::error::anyhow_status;
//! use routeflow::router::{Flow, Rou, Router};
//! use routeflow::server::{BufferedResponse, RequestHead};
//!
//! fn routes(r: &Rou<'_, RequestHead>) -> Flow {
//!     r.sta("/api").sub(|r| {
//!         r.pat("/api/users/{id}").methods(|r| {
//!             r.get().param_func(|_, sink, args| {
//!                 let _ = sink.write_body(format!("user {}", args[0]).as_bytes());
//!             })?;
//!             r.delete().func(|_, _| {})
//!         })
//!     })
//! }
//!
//! let router = Router::new();
//! let mut res = BufferedResponse::new();
//! router
//!     .route(&RequestHead::new(Method::GET, "/api/users/7"), &mut res, routes)
//!     .unwrap();
//! assert_eq!(res.text(), "user 7");
//!
//! let err = router
//!     .route(&RequestHead::new(Method::PUT, "/api/users/7"), &mut res, routes)
//!     .unwrap_err();
//! assert_eq!(anyhow_status(&err), Some(StatusCode::METHOD_NOT_ALLOWED));
//!
//! let err = router
//!     .route(&RequestHead::new(Method::GET, "/api/groups"), &mut res, routes)
//!     .unwrap_err();
//! assert_eq!(anyhow_status(&err), Some(StatusCode::NOT_FOUND));
//! ```

mod core;
mod cursor;
mod flow;
mod visit;

pub use core::Router;
pub use cursor::{Mode, Rou};
pub use flow::{Exit, Flow};
pub use visit::{Endpoint, Visitor};
