//! Handler trait and type erasure.
//!
//! # How a chain is stored
//!
//! Each stage of a chain holds the next one as a [`BoxedHandler`], an
//! `Arc<dyn RequestHandler>`. Stages never inherit from each other; they
//! compose:
//!
//! ```text
//! LoggingScopeHandler ── next ──▶ LoggingHandler ── next ──▶ HyperTransport
//!        │                             │                           │
//!   span + timing               timing + headers             socket I/O
//! ```
//!
//! A request travels down through [`RequestHandler::send`] and the response
//! (or the error) travels back up through the returned [`BoxFuture`].
//!
//! The only runtime cost per stage is **one boxed future** and **one virtual
//! call**, negligible compared to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// A heap-allocated, type-erased future that resolves to the chain's result.
///
/// `Send + 'static` let tokio move the future across worker threads while it
/// waits on the network, so no thread blocks for the duration of a request.
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// One stage of an outbound request chain.
///
/// Implementations must be shareable: the same instance serves every request
/// in flight at once.
pub trait RequestHandler: Send + Sync + 'static {
    /// Sends `req` down the chain.
    ///
    /// `cancel` belongs to the caller. Stages pass it on; the transport at the
    /// end observes it and fails with [`Error::Cancelled`].
    fn send(&self, req: Request, cancel: CancellationToken) -> BoxFuture;
}

/// A type-erased handler shared by every stage that points at it.
pub type BoxedHandler = Arc<dyn RequestHandler>;

/// Turns an async closure into a [`RequestHandler`].
///
/// Handy for test stubs and for small custom stages:
///
/// ```rust
/// use httplog::{Error, Response, handler_fn};
/// use http::StatusCode;
///
/// let ok = handler_fn(|_req, _cancel| async { Ok::<_, Error>(Response::new(StatusCode::OK)) });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    FnHandler(f)
}

/// Newtype wrapper returned by [`handler_fn`], bridging a closure to the
/// trait-object world.
#[derive(Clone, Copy)]
pub struct FnHandler<F>(F);

impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Request, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn send(&self, req: Request, cancel: CancellationToken) -> BoxFuture {
        Box::pin((self.0)(req, cancel))
    }
}

impl<H: RequestHandler + ?Sized> RequestHandler for Arc<H> {
    fn send(&self, req: Request, cancel: CancellationToken) -> BoxFuture {
        (**self).send(req, cancel)
    }
}
