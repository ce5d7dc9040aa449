//! The route cursor, [`Rou`].
//!
//! A cursor carries the match criteria being built up by a declaration
//! function (pattern, style, method, mode) and a shared reference to the
//! request being routed. Builder methods return new cursors and never mutate,
//! so sibling statements that start from the same cursor can't observe each
//! other's criteria.
//!
//! ```
//! use routeflow::router::{Flow, Rou};
//! use routeflow::server::RequestHead;
//!
//! fn routes(r: &Rou<'_, RequestHead>) -> Flow {
//!     r.exa("/").get().func(|_, sink| {
//!         let _ = sink.write_body(b"home");
//!     })?;
//!     r.sta("/articles").sub(|r| {
//!         r.exa("/articles").get().func(|_, _| {})?;
//!         r.pat("/articles/{id}").methods(|r| {
//!             r.get().param_func(|_, _, args| assert_eq!(args.len(), 1))?;
//!             r.delete().func(|_, _| {})
//!         })
//!     })
//! }
//! ```

use http::Method;
use std::any::type_name;
use std::cell::RefCell;
use std::fmt;

use super::flow::{Exit, Flow};
use super::visit::{Endpoint, Visitor};
use crate::error::RouteError;
use crate::method::method_matches;
use crate::pattern::{Captures, Match, PatternCache};
use crate::server::{respond, RequestDescriptor, ResponseSink};

/// What a path-match with a method mismatch means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The mismatch ends the attempt with `405 Method Not Allowed`.
    #[default]
    Strict,
    /// The mismatch is a silent non-match. Used inside method groups.
    Lax,
}

/// Request-scoped state shared by every cursor of one attempt.
pub(crate) trait Exchange<Q: ?Sized> {
    fn request(&self) -> &Q;
    fn cache(&self) -> &PatternCache;
    /// Run `f` with exclusive access to the response sink.
    fn with_sink(&self, f: &mut dyn FnMut(&mut dyn ResponseSink)) -> anyhow::Result<()>;
    fn is_dry_run(&self) -> bool;
    fn record(&self, endpoint: Endpoint);
}

pub(crate) struct Context<'a, Q: ?Sized> {
    req: &'a Q,
    sink: RefCell<&'a mut dyn ResponseSink>,
    visitor: Option<RefCell<&'a mut dyn Visitor>>,
    cache: &'a PatternCache,
}

impl<'a, Q: ?Sized> Context<'a, Q> {
    pub(crate) fn new(req: &'a Q, sink: &'a mut dyn ResponseSink, cache: &'a PatternCache) -> Self {
        Self {
            req,
            sink: RefCell::new(sink),
            visitor: None,
            cache,
        }
    }

    pub(crate) fn dry_run(
        req: &'a Q,
        sink: &'a mut dyn ResponseSink,
        visitor: &'a mut dyn Visitor,
        cache: &'a PatternCache,
    ) -> Self {
        Self {
            visitor: Some(RefCell::new(visitor)),
            ..Self::new(req, sink, cache)
        }
    }
}

impl<Q: ?Sized> Exchange<Q> for Context<'_, Q> {
    fn request(&self) -> &Q {
        self.req
    }

    fn cache(&self) -> &PatternCache {
        self.cache
    }

    fn with_sink(&self, f: &mut dyn FnMut(&mut dyn ResponseSink)) -> anyhow::Result<()> {
        let mut sink = self
            .sink
            .try_borrow_mut()
            .map_err(|_| anyhow::anyhow!("response sink is already in use by another handler"))?;
        f(&mut **sink);
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        self.visitor.is_some()
    }

    fn record(&self, endpoint: Endpoint) {
        if let Some(visitor) = &self.visitor {
            if let Ok(mut visitor) = visitor.try_borrow_mut() {
                visitor.endpoint(endpoint);
            }
        }
    }
}

/// Route cursor.
///
/// Obtained from [`Router::route`](super::Router::route) and friends, never
/// built directly. `Q` is the request type handed to handlers.
pub struct Rou<'a, Q: ?Sized> {
    ctx: &'a (dyn Exchange<Q> + 'a),
    pattern: &'a str,
    style: Match,
    method: Option<Method>,
    mode: Mode,
}

impl<Q: ?Sized> Clone for Rou<'_, Q> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx,
            pattern: self.pattern,
            style: self.style,
            method: self.method.clone(),
            mode: self.mode,
        }
    }
}

impl<Q: ?Sized> fmt::Debug for Rou<'_, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rou")
            .field("pattern", &self.pattern)
            .field("style", &self.style)
            .field("method", &self.method)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<'a, Q: ?Sized> Rou<'a, Q> {
    /// Root cursor: empty pattern, any method, strict.
    pub(crate) fn root(ctx: &'a (dyn Exchange<Q> + 'a)) -> Self {
        Self {
            ctx,
            pattern: "",
            style: Match::Exact,
            method: None,
            mode: Mode::Strict,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &'a str {
        self.pattern
    }

    #[must_use]
    pub fn style(&self) -> Match {
        self.style
    }

    /// Declared method, `None` for any method.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The request being routed.
    #[must_use]
    pub fn request(&self) -> &'a Q {
        self.ctx.request()
    }

    /// True during a dry run, where leaves report endpoints instead of
    /// handling anything.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.ctx.is_dry_run()
    }

    fn with_pattern<'b>(&self, pattern: &'b str, style: Match) -> Rou<'b, Q>
    where
        'a: 'b,
    {
        Rou {
            ctx: self.ctx,
            pattern,
            style,
            method: self.method.clone(),
            mode: Mode::Strict,
        }
    }

    /// Match the path exactly. Switches back to strict mode.
    #[must_use]
    pub fn exa<'b>(&self, pattern: &'b str) -> Rou<'b, Q>
    where
        'a: 'b,
    {
        self.with_pattern(pattern, Match::Exact)
    }

    /// Match a path prefix on a segment boundary. Switches back to strict
    /// mode.
    #[must_use]
    pub fn sta<'b>(&self, pattern: &'b str) -> Rou<'b, Q>
    where
        'a: 'b,
    {
        self.with_pattern(pattern, Match::Prefix)
    }

    /// Match a regular expression, unanchored unless the pattern says
    /// otherwise. Switches back to strict mode.
    #[must_use]
    pub fn reg<'b>(&self, pattern: &'b str) -> Rou<'b, Q>
    where
        'a: 'b,
    {
        self.with_pattern(pattern, Match::Regex)
    }

    /// Match an OAS path template such as `/articles/{id}`. Switches back to
    /// strict mode.
    #[must_use]
    pub fn pat<'b>(&self, pattern: &'b str) -> Rou<'b, Q>
    where
        'a: 'b,
    {
        self.with_pattern(pattern, Match::Template)
    }

    /// Match only `method`.
    #[must_use]
    pub fn meth(&self, method: Method) -> Self {
        Self {
            method: Some(method),
            ..self.clone()
        }
    }

    /// Match every method.
    #[must_use]
    pub fn any_method(&self) -> Self {
        Self {
            method: None,
            ..self.clone()
        }
    }

    /// Treat a method mismatch as a silent non-match.
    #[must_use]
    pub fn lax(&self) -> Self {
        Self {
            mode: Mode::Lax,
            ..self.clone()
        }
    }

    /// Treat a method mismatch as `405 Method Not Allowed`.
    #[must_use]
    pub fn strict(&self) -> Self {
        Self {
            mode: Mode::Strict,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn get(&self) -> Self {
        self.meth(Method::GET)
    }

    #[must_use]
    pub fn head(&self) -> Self {
        self.meth(Method::HEAD)
    }

    #[must_use]
    pub fn options(&self) -> Self {
        self.meth(Method::OPTIONS)
    }

    #[must_use]
    pub fn post(&self) -> Self {
        self.meth(Method::POST)
    }

    #[must_use]
    pub fn patch(&self) -> Self {
        self.meth(Method::PATCH)
    }

    #[must_use]
    pub fn put(&self) -> Self {
        self.meth(Method::PUT)
    }

    #[must_use]
    pub fn delete(&self) -> Self {
        self.meth(Method::DELETE)
    }

    #[must_use]
    pub fn connect(&self) -> Self {
        self.meth(Method::CONNECT)
    }

    #[must_use]
    pub fn trace(&self) -> Self {
        self.meth(Method::TRACE)
    }

    fn endpoint<H>(&self) -> Endpoint {
        Endpoint {
            pattern: self.pattern.to_owned(),
            style: self.style,
            method: self.method.clone(),
            handler: type_name::<H>(),
        }
    }

    /// Report the leaf during a dry run. True if the caller must stop there.
    fn record<H>(&self) -> bool {
        if !self.ctx.is_dry_run() {
            return false;
        }
        self.ctx.record(self.endpoint::<H>());
        true
    }
}

impl<'a, Q: RequestDescriptor + ?Sized> Rou<'a, Q> {
    fn method_not_allowed(&self) -> Exit {
        let req = self.ctx.request();
        RouteError::method_not_allowed(req.method(), req.path()).into()
    }

    fn not_found(&self) -> Exit {
        let req = self.ctx.request();
        RouteError::not_found(req.method(), req.path()).into()
    }

    fn check_method(&self) -> Result<bool, Exit> {
        if method_matches(self.method.as_ref(), self.ctx.request().method()) {
            return Ok(true);
        }
        match self.mode {
            Mode::Lax => Ok(false),
            Mode::Strict => Err(self.method_not_allowed()),
        }
    }

    /// Path-only test, ignoring method and mode.
    pub fn matches_path(&self) -> Result<bool, Exit> {
        let path = self.ctx.request().path();
        Ok(self.style.is_match(self.ctx.cache(), self.pattern, path)?)
    }

    /// Full test against the request.
    ///
    /// `Ok(false)` on a path mismatch. On a path match with a method
    /// mismatch, `Ok(false)` in lax mode and `Err` with
    /// `405 Method Not Allowed` in strict mode.
    pub fn is_match(&self) -> Result<bool, Exit> {
        if !self.matches_path()? {
            return Ok(false);
        }
        self.check_method()
    }

    /// Like [`Rou::is_match`], returning the positional captures on a match.
    pub fn submatch(&self) -> Result<Option<Captures<'a>>, Exit> {
        let path = self.ctx.request().path();
        let Some(caps) = self.style.submatch(self.ctx.cache(), self.pattern, path)? else {
            return Ok(None);
        };
        Ok(self.check_method()?.then_some(caps))
    }

    fn dispatch<H>(&self, handler: H) -> Flow
    where
        H: FnOnce(&'a Q, &mut dyn ResponseSink) -> anyhow::Result<()>,
    {
        let req = self.ctx.request();
        let mut handler = Some(handler);
        let mut outcome = Ok(());
        self.ctx.with_sink(&mut |sink| {
            if let Some(handler) = handler.take() {
                outcome = handler(req, sink);
            }
        })?;
        outcome?;
        Err(Exit::Handled)
    }

    /// Leaf: on a match, call `handler` and end the attempt.
    pub fn func<F>(&self, handler: F) -> Flow
    where
        F: FnOnce(&Q, &mut dyn ResponseSink),
    {
        if self.record::<F>() || !self.is_match()? {
            return Ok(());
        }
        self.dispatch(|req, sink| {
            handler(req, sink);
            Ok(())
        })
    }

    /// Leaf: on a match, call `handler` with the captures and end the attempt.
    pub fn param_func<F>(&self, handler: F) -> Flow
    where
        F: FnOnce(&Q, &mut dyn ResponseSink, &[&str]),
    {
        if self.record::<F>() {
            return Ok(());
        }
        let Some(args) = self.submatch()? else {
            return Ok(());
        };
        self.dispatch(|req, sink| {
            handler(req, sink, &args);
            Ok(())
        })
    }

    /// Leaf: on a match, call a fallible `handler`. Its error becomes the
    /// error of the whole attempt.
    pub fn try_func<F>(&self, handler: F) -> Flow
    where
        F: FnOnce(&Q, &mut dyn ResponseSink) -> anyhow::Result<()>,
    {
        if self.record::<F>() || !self.is_match()? {
            return Ok(());
        }
        self.dispatch(handler)
    }

    /// Leaf: on a match, write the response built by `handler` with
    /// [`respond`] and end the attempt.
    pub fn res<F, B>(&self, handler: F) -> Flow
    where
        F: FnOnce(&Q) -> http::Response<B>,
        B: AsRef<[u8]>,
    {
        if self.record::<F>() || !self.is_match()? {
            return Ok(());
        }
        self.dispatch(|req, sink| Ok(respond(sink, handler(req))?))
    }

    /// Leaf: like [`Rou::res`], passing the captures to `handler`.
    pub fn param_res<F, B>(&self, handler: F) -> Flow
    where
        F: FnOnce(&Q, &[&str]) -> http::Response<B>,
        B: AsRef<[u8]>,
    {
        if self.record::<F>() {
            return Ok(());
        }
        let Some(args) = self.submatch()? else {
            return Ok(());
        };
        self.dispatch(|req, sink| Ok(respond(sink, handler(req, &args))?))
    }

    /// Sub-routing: on a full match, run the nested declaration function.
    ///
    /// If nothing inside handles the request the attempt ends with
    /// `404 Not Found`; siblings declared after this call are not tried.
    pub fn sub<F>(&self, fun: F) -> Flow
    where
        F: FnOnce(&Rou<'a, Q>) -> Flow,
    {
        if self.ctx.is_dry_run() {
            return fun(self);
        }
        if !self.is_match()? {
            return Ok(());
        }
        fun(self)?;
        Err(self.not_found())
    }

    /// Method group: on a path match, run the nested declaration function in
    /// lax mode.
    ///
    /// Each leaf inside is tried in turn by method. If none matches the attempt
    /// ends with `405 Method Not Allowed`.
    pub fn methods<F>(&self, fun: F) -> Flow
    where
        F: FnOnce(&Rou<'a, Q>) -> Flow,
    {
        let lax = self.lax();
        if self.ctx.is_dry_run() {
            return fun(&lax);
        }
        if !self.matches_path()? {
            return Ok(());
        }
        fun(&lax)?;
        Err(self.method_not_allowed())
    }
}
