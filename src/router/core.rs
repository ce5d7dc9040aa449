//! Router core module - entry points of a routing attempt.
//!
//! [`Router`] owns the configuration and the compiled-pattern cache. Each call
//! to [`Router::route`] builds a request-scoped context on the stack, hands a
//! root [`Rou`] to the declaration function and turns the resulting [`Flow`]
//! into an ordinary `Result`.

use std::time::Instant;
use tracing::{debug, info, warn};

use super::cursor::{Context, Rou};
use super::flow::{Exit, Flow};
use super::visit::{Endpoint, Visitor};
use crate::error::RouteError;
use crate::pattern::PatternCache;
use crate::runtime_config::RouterConfig;
use crate::server::{write_error, NopSink, RequestDescriptor, ResponseSink};

/// Request router.
///
/// Holds no route table: routes are plain statements in a declaration
/// function, re-run for every request. Cloning is cheap and clones share the
/// pattern cache.
///
/// ```
/// use http::{Method, StatusCode};
/// use routeflow::router::{Flow, Rou, Router};
/// use routeflow::server::{BufferedResponse, RequestHead};
///
/// fn routes(r: &Rou<'_, RequestHead>) -> Flow {
///     r.exa("/").get().func(|_, sink| {
///         let _ = sink.write_body(b"home");
///     })?;
///     r.pat("/articles/{id}").get().param_func(|_, sink, args| {
///         let _ = sink.write_body(args[0].as_bytes());
///     })
/// }
///
/// let router = Router::new();
/// let mut res = BufferedResponse::new();
/// router.serve(&RequestHead::new(Method::GET, "/articles/42"), &mut res, routes);
/// assert_eq!(res.text(), "42");
///
/// let mut res = BufferedResponse::new();
/// router.serve(&RequestHead::new(Method::POST, "/"), &mut res, routes);
/// assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    cache: PatternCache,
    config: RouterConfig,
}

impl Router {
    /// Router with the default configuration and a fresh cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            cache: PatternCache::with_enabled(config.pattern_cache),
            config,
        }
    }

    /// Router configured from `ROUTEFLOW_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(RouterConfig::from_env())
    }

    /// Use `cache` instead of this router's own, e.g. to share one cache
    /// between several routers.
    #[must_use]
    pub fn with_cache(mut self, cache: PatternCache) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route one request.
    ///
    /// Runs `fun` with a root cursor (empty pattern, any method, strict mode)
    /// and returns:
    ///
    /// - `Ok(())` if a leaf handled the request;
    /// - [`RouteError::NotFound`] if `fun` returned without any leaf matching;
    /// - [`RouteError::MethodNotAllowed`] if a path matched but its method did
    ///   not;
    /// - any other error raised by `fun` or a handler, unchanged.
    ///
    /// Performs no I/O of its own; see [`Router::serve`] for error rendering.
    pub fn route<Q, F>(&self, req: &Q, sink: &mut dyn ResponseSink, fun: F) -> anyhow::Result<()>
    where
        Q: RequestDescriptor + ?Sized,
        F: FnOnce(&Rou<'_, Q>) -> Flow,
    {
        let method = req.method();
        let path = req.path();
        debug!(method = %method, path = %path, "Route match attempt");

        let start = Instant::now();
        let outcome = {
            let ctx = Context::new(req, sink, &self.cache);
            fun(&Rou::root(&ctx))
        };
        let duration = start.elapsed();

        let result = match outcome {
            Err(Exit::Handled) => Ok(()),
            Err(Exit::Failed(err)) => Err(err),
            Ok(()) => Err(RouteError::not_found(method, path).into()),
        };

        match &result {
            Ok(()) if duration > self.config.slow_route_threshold() => {
                warn!(
                    method = %method,
                    path = %path,
                    duration_us = duration.as_micros(),
                    threshold_us = self.config.slow_route_threshold_us,
                    "Slow route evaluation detected"
                );
            }
            Ok(()) => {
                info!(
                    method = %method,
                    path = %path,
                    duration_us = duration.as_micros(),
                    "Route handled"
                );
            }
            Err(err) => match err.downcast_ref::<RouteError>() {
                Some(RouteError::NotFound { .. }) => {
                    debug!(
                        method = %method,
                        path = %path,
                        duration_us = duration.as_micros(),
                        "No route matched"
                    );
                }
                Some(RouteError::MethodNotAllowed { .. }) => {
                    debug!(
                        method = %method,
                        path = %path,
                        duration_us = duration.as_micros(),
                        "Method not allowed"
                    );
                }
                None => {
                    debug!(
                        method = %method,
                        path = %path,
                        duration_us = duration.as_micros(),
                        error = %err,
                        "Route evaluation failed"
                    );
                }
            },
        }

        result
    }

    /// [`Router::route`], then render any error into `sink` with
    /// [`write_error`].
    pub fn serve<Q, F>(&self, req: &Q, sink: &mut dyn ResponseSink, fun: F)
    where
        Q: RequestDescriptor + ?Sized,
        F: FnOnce(&Rou<'_, Q>) -> Flow,
    {
        if let Err(err) = self.route(req, &mut *sink, fun) {
            write_error(sink, &err);
        }
    }

    /// Dry run: execute `fun` without a real request, reporting every leaf
    /// to `visitor` in declaration order.
    ///
    /// Handlers are never called and routing errors are never raised. Errors
    /// raised by `fun` itself are returned.
    pub fn visit<Q, F>(&self, fun: F, visitor: &mut dyn Visitor) -> anyhow::Result<()>
    where
        Q: RequestDescriptor + Default,
        F: FnOnce(&Rou<'_, Q>) -> Flow,
    {
        let req = Q::default();
        let mut sink = NopSink;
        let outcome = {
            let ctx = Context::dry_run(&req, &mut sink, visitor, &self.cache);
            fun(&Rou::root(&ctx))
        };
        match outcome {
            Ok(()) | Err(Exit::Handled) => Ok(()),
            Err(Exit::Failed(err)) => Err(err),
        }
    }

    /// Every endpoint `fun` declares, in declaration order.
    pub fn endpoints<Q, F>(&self, fun: F) -> anyhow::Result<Vec<Endpoint>>
    where
        Q: RequestDescriptor + Default,
        F: FnOnce(&Rou<'_, Q>) -> Flow,
    {
        let mut out: Vec<Endpoint> = Vec::new();
        self.visit::<Q, F>(fun, &mut |endpoint: Endpoint| out.push(endpoint))?;
        Ok(out)
    }

    /// Dry run that compiles the pattern of every declared leaf into the
    /// cache.
    ///
    /// Surfaces malformed patterns at startup instead of on the first request
    /// that reaches them. Returns the endpoints on success, or the first
    /// [`PatternError`](crate::pattern::PatternError) in declaration order.
    pub fn validate<Q, F>(&self, fun: F) -> anyhow::Result<Vec<Endpoint>>
    where
        Q: RequestDescriptor + Default,
        F: FnOnce(&Rou<'_, Q>) -> Flow,
    {
        let endpoints = self.endpoints::<Q, F>(fun)?;
        for endpoint in &endpoints {
            self.cache.precompile(endpoint.style, &endpoint.pattern)?;
        }
        info!(
            endpoints = endpoints.len(),
            cached_patterns = self.cache.len(),
            "Route declarations validated"
        );
        Ok(endpoints)
    }
}
