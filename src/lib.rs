//! # lane
//!
//! A minimal HTTP framework where middleware attaches to routes, not to the
//! application.
//!
//! ## The contract
//!
//! Most frameworks bolt middleware onto the whole application and make each
//! route opt out. lane inverts that: a route gets exactly the middleware you
//! chain around it, and an application-wide link is something you ask for
//! explicitly. What that buys you:
//!
//! - **Per-route chains** — wrap `/` and `/hello/{name}` in auth, leave
//!   `/login` bare, without route groups or tower layers
//! - **Radix-tree routing** — O(path-length) lookup via [`matchit`]
//! - **Parameter recovery** — [`with_params`] hands route parameters to a
//!   handler buried in a chain that otherwise only sees the plain request
//! - **Graceful shutdown** — SIGTERM / Ctrl-C, drains in-flight requests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lane::middleware::{Chain, Next};
//! use lane::{with_params, Method, Params, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::new();
//!     // with_params re-queries the table the request matched against, so
//!     // take a handle before registrations consume the builder.
//!     let matcher = router.clone();
//!
//!     let router = router
//!         .post("/login", login)
//!         .mount(Method::Get, "/", Chain::new().link(auth).terminal(profile))
//!         .mount(
//!             Method::Get,
//!             "/hello/{name}",
//!             Chain::new().link(auth).terminal(with_params(matcher, hello)),
//!         );
//!
//!     Server::bind("0.0.0.0:8080").serve(router).await.expect("server error");
//! }
//!
//! async fn login(_req: Request, _params: Params) -> Response {
//!     Response::text("This is the content of the login controller\n")
//! }
//!
//! async fn profile(_req: Request) -> Response {
//!     Response::text("This is the content of the profile controller\n")
//! }
//!
//! async fn hello(_req: Request, params: Params) -> Response {
//!     Response::text(format!("Hello, {}!\n", params.get("name").unwrap_or("")))
//! }
//!
//! async fn auth(req: Request, next: Next) -> Response {
//!     // before the controller
//!     let response = next.run(req).await;
//!     // after the controller
//!     response
//! }
//! ```

mod error;
mod handler;
mod method;
mod params;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod middleware;

pub use error::Error;
pub use handler::{Handler, ParamHandler};
pub use method::Method;
pub use params::{with_params, Params};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
