//! Per-request tracing middleware.

use std::time::Instant;

use tracing::info;

use crate::middleware::Next;
use crate::request::Request;
use crate::response::Response;

/// Emits one event per request it wraps: method, path, response status, and
/// latency.
///
/// Attach to every route with [`Router::with`](crate::Router::with), or to a
/// single route as an ordinary chain link:
///
/// ```rust,no_run
/// use lane::{middleware, Router};
///
/// let app = Router::new().with(middleware::trace);
/// ```
pub async fn trace(req: Request, next: Next) -> Response {
    let method = req.method();
    let path = req.path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        path,
        status = response.status_code(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}
