//! Route parameter bindings, and the adapter that recovers them for handlers
//! buried inside middleware chains.
//!
//! When the router dispatches straight to a [`ParamHandler`](crate::ParamHandler),
//! extraction and invocation happen in one step and the handler receives the
//! bindings as its second argument. A middleware [`Chain`](crate::middleware::Chain)
//! terminates in a plain [`Handler`](crate::Handler) instead, whose signature
//! has no parameter argument — the bindings the outer match produced are gone
//! by the time the chain reaches its terminal. [`with_params`] closes that gap
//! by looking the request up in the router a second time, at call time.

use std::collections::HashMap;

use crate::handler::{ErasedHandler, Handler, ParamHandler};
use crate::request::Request;
use crate::router::Router;

/// Parameter bindings from matching a concrete path against a route pattern.
///
/// For the pattern `/hello/{name}` and the path `/hello/world`, `get("name")`
/// returns `Some("world")`. Bindings live for one dispatch and are dropped
/// when the handler completes.
#[derive(Clone, Debug, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Returns the value bound to `name`, if the matched pattern had such a
    /// segment.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Adapts a parameter-aware handler to the plain signature a middleware
/// chain terminates in.
///
/// The returned handler re-derives the bindings by matching the request's
/// method and path against `router` — the same table that dispatched the
/// request in the first place, reached through a clone of its shared handle.
/// The second match is redundant but equivalent: the outer router already
/// matched this exact method and path. If it somehow does not match, the
/// handler runs with empty bindings rather than failing.
///
/// ```rust,no_run
/// use lane::middleware::{Chain, Next};
/// use lane::{with_params, Method, Params, Request, Response, Router};
///
/// async fn hello(_req: Request, params: Params) -> Response {
///     Response::text(format!("Hello, {}!\n", params.get("name").unwrap_or("")))
/// }
/// # async fn auth(req: Request, next: Next) -> Response { next.run(req).await }
///
/// let router = Router::new();
/// let matcher = router.clone();
/// let router = router.mount(
///     Method::Get,
///     "/hello/{name}",
///     Chain::new().link(auth).terminal(with_params(matcher, hello)),
/// );
/// ```
pub fn with_params(router: Router, handler: impl ParamHandler) -> impl Handler {
    let handler = handler.into_boxed_handler();
    move |req: Request| {
        let params = router.params_for(req.method(), req.path());
        handler.call(req, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::middleware::Chain;
    use crate::response::Response;

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, path.to_owned(), Vec::new(), Vec::new())
    }

    async fn hello(_req: Request, params: Params) -> Response {
        Response::text(format!("Hello, {}!\n", params.get("name").unwrap_or("")))
    }

    #[tokio::test]
    async fn recovers_bindings_for_a_chained_handler() {
        let router = Router::new();
        let matcher = router.clone();
        let router = router.mount(
            Method::Get,
            "/hello/{name}",
            Chain::new().terminal(with_params(matcher, hello)),
        );

        let res = router.dispatch(request(Method::Get, "/hello/world")).await;
        assert_eq!(res.body(), b"Hello, world!\n");

        let res = router.dispatch(request(Method::Get, "/hello/42")).await;
        assert_eq!(res.body(), b"Hello, 42!\n");
    }

    #[tokio::test]
    async fn missing_match_yields_empty_bindings() {
        // An empty router never matches; the adapted handler still runs.
        let handler = with_params(Router::new(), |_req: Request, params: Params| async move {
            assert!(params.is_empty());
            Response::text("ran")
        })
        .into_boxed_handler();

        let res = handler
            .call(request(Method::Get, "/anything"), Params::default())
            .await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"ran");
    }
}
