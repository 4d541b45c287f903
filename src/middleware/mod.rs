//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, authentication-header
//! inspection, response decoration. In lane it attaches where you point it —
//! around one route via a [`Chain`], or around every route via
//! [`Router::with`](crate::Router::with) — instead of silently wrapping the
//! whole application.
//!
//! # Execution order
//!
//! Links nest. The first link appended is outermost: its before-logic runs
//! first and its after-logic runs last.
//!
//! ```text
//! Chain::new().link(a).link(b).terminal(h)
//!
//! a before → b before → h → b after → a after
//! ```
//!
//! A link receives the request and a [`Next`] handle. Calling
//! [`Next::run`] hands the request to the rest of the chain; dropping the
//! handle instead short-circuits — no later link and no terminal handler
//! executes, and the link's own return value becomes the response.
//!
//! # Writing middleware
//!
//! Any `async fn(Request, Next) -> impl IntoResponse` is middleware:
//!
//! ```rust,no_run
//! use lane::middleware::{Chain, Next};
//! use lane::{Method, Request, Response, Router, Status};
//!
//! async fn guard(req: Request, next: Next) -> Response {
//!     if req.header("authorization").is_none() {
//!         return Response::status(Status::Unauthorized);
//!     }
//!     next.run(req).await
//! }
//!
//! async fn admin(_req: Request) -> Response {
//!     Response::text("admin area")
//! }
//!
//! Router::new().mount(Method::Get, "/admin", Chain::new().link(guard).terminal(admin));
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::params::Params;
use crate::request::Request;
use crate::response::IntoResponse;

mod trace;

pub use trace::trace;

// ── Middleware trait ──────────────────────────────────────────────────────────

/// A unit of cross-cutting logic composed around a terminal handler.
///
/// Sealed: automatically satisfied for any
/// `async fn(Request, Next) -> impl IntoResponse`, never implemented by hand.
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

pub(crate) type ArcMiddleware = Arc<dyn Middleware>;

// ── Next ─────────────────────────────────────────────────────────────────────

/// Handle to the remainder of a middleware chain.
///
/// Consumed by [`run`](Next::run), so a link invokes the rest of the chain at
/// most once. Dropping it without running short-circuits the chain.
pub struct Next {
    links: Arc<[ArcMiddleware]>,
    index: usize,
    terminal: BoxedHandler,
    params: Params,
}

impl Next {
    pub(crate) fn new(links: Arc<[ArcMiddleware]>, terminal: BoxedHandler, params: Params) -> Self {
        Self { links, index: 0, terminal, params }
    }

    /// Runs the rest of the chain: the links after this one, in order, then
    /// the terminal handler.
    pub fn run(mut self, req: Request) -> BoxFuture {
        match self.links.get(self.index) {
            Some(link) => {
                let link = Arc::clone(link);
                self.index += 1;
                link.call(req, self)
            }
            None => self.terminal.call(req, self.params),
        }
    }
}

// ── Chain ────────────────────────────────────────────────────────────────────

/// An ordered middleware chain under construction.
///
/// Append links with [`link`](Chain::link), then close the chain with its
/// terminal handler. The result registers on the router via
/// [`Router::mount`](crate::Router::mount).
pub struct Chain {
    links: Vec<ArcMiddleware>,
}

impl Chain {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Appends a link. Links run in append order on the way in and reverse
    /// order on the way out.
    pub fn link(mut self, mw: impl Middleware) -> Self {
        self.links.push(Arc::new(mw));
        self
    }

    /// Closes the chain with its terminal handler.
    ///
    /// The terminal has the plain [`Handler`] signature. If it needs the
    /// route's parameters, adapt it with [`with_params`](crate::with_params)
    /// first.
    pub fn terminal(self, handler: impl Handler) -> Chained {
        Chained {
            links: self.links.into(),
            terminal: handler.into_boxed_handler(),
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished chain, ready for [`Router::mount`](crate::Router::mount).
pub struct Chained {
    links: Arc<[ArcMiddleware]>,
    terminal: BoxedHandler,
}

impl Chained {
    pub(crate) fn into_boxed(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl ErasedHandler for Chained {
    fn call(&self, req: Request, params: Params) -> BoxFuture {
        Next::new(Arc::clone(&self.links), Arc::clone(&self.terminal), params).run(req)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::method::Method;
    use crate::response::Response;
    use crate::router::Router;
    use crate::status::Status;

    type Log = Arc<Mutex<Vec<String>>>;

    fn request(path: &str) -> Request {
        Request::new(Method::Get, path.to_owned(), Vec::new(), Vec::new())
    }

    fn recording(log: &Log, name: &'static str) -> impl Middleware {
        let log = Arc::clone(log);
        move |req: Request, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{name}:before"));
                let response = next.run(req).await;
                log.lock().unwrap().push(format!("{name}:after"));
                response
            }
        }
    }

    fn logging_terminal(log: &Log) -> impl Handler {
        let log = Arc::clone(log);
        move |_req: Request| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push("handler".to_owned());
                Response::text("done")
            }
        }
    }

    #[tokio::test]
    async fn links_nest_around_the_terminal_handler() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new()
            .link(recording(&log, "outer"))
            .link(recording(&log, "inner"))
            .terminal(logging_terminal(&log));

        let router = Router::new().mount(Method::Get, "/wrapped", chain);
        router.dispatch(request("/wrapped")).await;

        assert_eq!(
            *log.lock().unwrap(),
            ["outer:before", "inner:before", "handler", "inner:after", "outer:after"],
        );
    }

    #[tokio::test]
    async fn a_link_that_drops_next_halts_the_chain() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let chain = Chain::new()
            .link(|_req: Request, _next: Next| async move {
                Response::status(Status::Unauthorized)
            })
            .terminal(move |_req: Request| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Response::text("never reached")
                }
            });

        let router = Router::new().mount(Method::Get, "/guarded", chain);
        let res = router.dispatch(request("/guarded")).await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn global_links_run_outside_route_chains() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new()
            .link(recording(&log, "route"))
            .terminal(logging_terminal(&log));

        let router = Router::new()
            .with(recording(&log, "global"))
            .mount(Method::Get, "/wrapped", chain);
        router.dispatch(request("/wrapped")).await;

        assert_eq!(
            *log.lock().unwrap(),
            ["global:before", "route:before", "handler", "route:after", "global:after"],
        );
    }
}
