//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. Routes
//! register in two shapes: [`on`](Router::on) couples parameter extraction to
//! invocation and hands the handler its bindings, [`mount`](Router::mount)
//! installs a middleware [`Chain`](crate::middleware::Chain) whose terminal
//! sees only the plain request.
//!
//! The router is a cheap clone — registrations share one table behind a lock
//! that is write-locked only during startup. That is what lets
//! [`with_params`](crate::with_params) hold a handle onto the very table its
//! handler is registered in and re-query it at request time.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, ParamHandler};
use crate::method::Method;
use crate::middleware::{ArcMiddleware, Chained, Middleware, Next};
use crate::params::Params;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration call returns `self` so they chain naturally. Clone it
/// first if something else — typically [`with_params`](crate::with_params) —
/// needs a handle onto the same table.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    links: Arc<[ArcMiddleware]>,
}

impl Inner {
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, Params)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                routes: HashMap::new(),
                links: Arc::from(Vec::new()),
            })),
        }
    }

    /// Registers a parameter-aware handler for a method + path pair. Returns
    /// `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and arrive as the handler's second
    /// argument:
    ///
    /// ```rust,no_run
    /// use lane::{Method, Params, Request, Response, Router};
    ///
    /// async fn get_user(_req: Request, params: Params) -> Response {
    ///     Response::text(format!("user {}", params.get("id").unwrap_or("")))
    /// }
    ///
    /// Router::new().on(Method::Get, "/users/{id}", get_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or conflicts with an
    /// existing registration for the same method.
    pub fn on(self, method: Method, path: &str, handler: impl ParamHandler) -> Self {
        self.add(method, path, handler.into_boxed_handler())
    }

    /// Mounts a finished middleware chain at a method + path pair.
    ///
    /// The chain's terminal handler has the plain signature and is invoked
    /// without the matched parameters; adapt it with
    /// [`with_params`](crate::with_params) if it needs them.
    ///
    /// # Panics
    ///
    /// Same conditions as [`on`](Router::on).
    pub fn mount(self, method: Method, path: &str, chain: Chained) -> Self {
        self.add(method, path, chain.into_boxed())
    }

    /// Attaches middleware to every route.
    ///
    /// Application-wide links run outermost — before any per-route chain —
    /// in the order they were attached. Requests that match no route skip
    /// middleware entirely.
    pub fn with(self, mw: impl Middleware) -> Self {
        {
            let mut inner = self.inner.write().expect("route table lock poisoned");
            let mut links: Vec<ArcMiddleware> = inner.links.to_vec();
            links.push(Arc::new(mw));
            inner.links = links.into();
        }
        self
    }

    /// `GET` shorthand for [`on`](Router::on).
    pub fn get(self, path: &str, handler: impl ParamHandler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// `POST` shorthand for [`on`](Router::on).
    pub fn post(self, path: &str, handler: impl ParamHandler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// `PUT` shorthand for [`on`](Router::on).
    pub fn put(self, path: &str, handler: impl ParamHandler) -> Self {
        self.on(Method::Put, path, handler)
    }

    /// `PATCH` shorthand for [`on`](Router::on).
    pub fn patch(self, path: &str, handler: impl ParamHandler) -> Self {
        self.on(Method::Patch, path, handler)
    }

    /// `DELETE` shorthand for [`on`](Router::on).
    pub fn delete(self, path: &str, handler: impl ParamHandler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    fn add(self, method: Method, path: &str, handler: BoxedHandler) -> Self {
        {
            let mut inner = self.inner.write().expect("route table lock poisoned");
            inner
                .routes
                .entry(method)
                .or_default()
                .insert(path, handler)
                .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        }
        self
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, Params)> {
        self.inner
            .read()
            .expect("route table lock poisoned")
            .lookup(method, path)
    }

    /// Re-derives the parameter bindings for a request this table already
    /// matched. Empty when nothing matches.
    pub(crate) fn params_for(&self, method: Method, path: &str) -> Params {
        self.lookup(method, path)
            .map(|(_, params)| params)
            .unwrap_or_default()
    }

    /// Routes one request to a response: match, wrap in the application-wide
    /// links, run.
    pub(crate) async fn dispatch(&self, req: Request) -> Response {
        // The read guard must not be held across the handler's await point.
        let matched = {
            let inner = self.inner.read().expect("route table lock poisoned");
            inner
                .lookup(req.method(), req.path())
                .map(|(handler, params)| (handler, params, Arc::clone(&inner.links)))
        };

        match matched {
            Some((handler, params, links)) => Next::new(links, handler, params).run(req).await,
            None => Response::status(Status::NotFound),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, path.to_owned(), Vec::new(), Vec::new())
    }

    #[tokio::test]
    async fn binds_named_segments() {
        let router = Router::new().on(
            Method::Get,
            "/hello/{name}",
            |_req: Request, params: Params| async move {
                Response::text(format!("Hello, {}!\n", params.get("name").unwrap_or("")))
            },
        );

        let (_, params) = router.lookup(Method::Get, "/hello/world").unwrap();
        assert_eq!(params.get("name"), Some("world"));

        let res = router.dispatch(request(Method::Get, "/hello/world")).await;
        assert_eq!(res.body(), b"Hello, world!\n");
    }

    #[tokio::test]
    async fn unmatched_routes_never_reach_a_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().on(
            Method::Get,
            "/present",
            move |_req: Request, _params: Params| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Response::text("hit")
                }
            },
        );

        let res = router.dispatch(request(Method::Get, "/absent")).await;
        assert_eq!(res.status_code(), 404);

        // Method is part of the match, not just the path.
        let res = router.dispatch(request(Method::Post, "/present")).await;
        assert_eq!(res.status_code(), 404);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn shared_handles_see_later_registrations() {
        let router = Router::new();
        let matcher = router.clone();
        let _router = router.on(
            Method::Get,
            "/items/{id}",
            |_req: Request, _params: Params| async move { Response::text("ok") },
        );

        assert_eq!(
            matcher.params_for(Method::Get, "/items/7").get("id"),
            Some("7"),
        );
        assert!(matcher.params_for(Method::Get, "/nope").is_empty());
    }
}
