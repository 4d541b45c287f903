//! Per-route middleware — three endpoints, two of them wrapped in auth.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example per_route
//!
//! Try:
//!   curl -X POST http://localhost:8080/login
//!   curl http://localhost:8080/
//!   curl http://localhost:8080/hello/world

use lane::middleware::{self, Chain, Next};
use lane::{with_params, Method, Params, Request, Response, Router, Server};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // One request event for every route, wrapped outermost.
    let router = Router::new().with(middleware::trace);

    // with_params re-queries the table the request matched against, so take
    // a handle before the registrations below consume the builder.
    let matcher = router.clone();

    let router = router
        .post("/login", login)
        // middleware for a specific route
        .mount(Method::Get, "/", Chain::new().link(auth).terminal(profile))
        // middleware for a specific route whose handler also needs its
        // parameters
        .mount(
            Method::Get,
            "/hello/{name}",
            Chain::new().link(auth).terminal(with_params(matcher, hello)),
        );

    Server::bind("0.0.0.0:8080")
        .serve(router)
        .await
        .expect("server error");
}

// POST /login — registered bare, no middleware.
async fn login(_req: Request, _params: Params) -> Response {
    info!("executing login controller");
    Response::text("This is the content of the login controller\n")
}

// GET /
async fn profile(_req: Request) -> Response {
    info!("executing profile controller");
    Response::text("This is the content of the profile controller\n")
}

// GET /hello/{name}
async fn hello(_req: Request, params: Params) -> Response {
    info!("executing hello controller");
    Response::text(format!("Hello, {}!\n", params.get("name").unwrap_or("")))
}

// The "auth" middleware authenticates nothing — it demonstrates where the
// before and after phases land relative to the controller.
async fn auth(req: Request, next: Next) -> Response {
    info!("auth middleware -> before executing controller");

    let response = next.run(req).await;

    info!("auth middleware -> after the controller was executed");

    response
}
