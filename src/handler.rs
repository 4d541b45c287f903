//! Handler traits and type erasure.
//!
//! # Two handler shapes
//!
//! The router stores one value per route, but user code writes handlers in
//! two shapes:
//!
//! ```text
//! async fn plain(req: Request) -> Response                  ← Handler
//! async fn aware(req: Request, params: Params) -> Response  ← ParamHandler
//! ```
//!
//! [`ParamHandler`] is the primary registration shape — the router couples
//! parameter extraction to invocation and passes the bindings straight in.
//! [`Handler`] is the shape middleware chains terminate in: the chain hands a
//! request onward and nothing else, so the plain handler never sees the
//! bindings the match produced.
//!
//! # How both are stored
//!
//! Rust collections hold one concrete type, so every handler is erased behind
//! the internal `ErasedHandler` interface:
//!
//! ```text
//! async fn aware(req, params) -> Response      ← user writes this
//!        ↓ router.on(Method::Get, "/users/{id}", aware)
//! aware.into_boxed_handler()                   ← ParamHandler blanket impl
//!        ↓
//! Arc::new(FnParamHandler(aware))              ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req, params)  at request time   ← one vtable dispatch
//! ```
//!
//! `ErasedHandler::call` always receives the bindings; the wrapper around a
//! plain handler simply drops them. The runtime cost per request is one Arc
//! clone plus one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::params::Params;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place — it cannot
/// move it in memory after the first poll. `Send + 'static` let tokio move
/// the future across threads.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// signatures of the public `Middleware` and `Next` APIs.
#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` for the same reason as [`BoxFuture`]. External crates
/// cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request, params: Params) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public traits ─────────────────────────────────────────────────────────────

/// Implemented for every plain route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// impls in this crate can satisfy it, which keeps the API surface stable
/// across versions.
pub trait Handler: private::SealedHandler + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// Implemented for every parameter-aware route handler.
///
/// Automatically satisfied for any `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request, params: Params) -> impl IntoResponse
/// ```
///
/// Sealed, like [`Handler`].
pub trait ParamHandler: private::SealedParamHandler + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// The sealing module. Because these traits are private, external crates
/// cannot name them and therefore cannot implement [`Handler`] or
/// [`ParamHandler`] on their own types.
mod private {
    pub trait SealedHandler {}
    pub trait SealedParamHandler {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

/// `Fn(Request) -> Fut` covers named `async fn` items, closures returning
/// async blocks, and any struct that implements `Fn`.
impl<F, Fut, R> private::SealedHandler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

impl<F, Fut, R> private::SealedParamHandler for F
where
    F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> ParamHandler for F
where
    F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnParamHandler(self))
    }
}

// ── Concrete wrappers ─────────────────────────────────────────────────────────

/// Bridges a concrete plain handler `F` to the trait-object world. The
/// bindings the router matched are dropped here — a plain handler has no
/// parameter argument to receive them.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, _params: Params) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Bridges a concrete parameter-aware handler `F` to the trait-object world.
struct FnParamHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnParamHandler<F>
where
    F: Fn(Request, Params) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, params: Params) -> BoxFuture {
        let fut = (self.0)(req, params);
        Box::pin(async move { fut.await.into_response() })
    }
}
