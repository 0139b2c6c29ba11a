//! # httplog
//!
//! Request-lifecycle logging for outbound HTTP handler chains.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! A client is a chain of handlers: your stages on top, a transport at the
//! bottom. httplog adds two observers to that chain and stays out of the way:
//!
//! - **[`LoggingHandler`](middleware::LoggingHandler)**: sits right above the
//!   transport, logs start, end, elapsed time and (at `TRACE`) headers.
//! - **[`LoggingScopeHandler`](middleware::LoggingScopeHandler)**: sits at
//!   the top, opens a span for the whole pass and times everything below.
//!
//! What other stages own, and httplog intentionally ignores:
//!
//! - **Retries**, **redirects**, **authentication**, **header rewriting**
//! - **Timeouts**: cancellation arrives through the caller's
//!   [`CancellationToken`](tokio_util::sync::CancellationToken) and is
//!   passed on untouched
//!
//! Errors are never caught or wrapped. A failed request logs its start and
//! no end, which is how a hang tells itself apart from a failure.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use httplog::middleware::{LoggingHandler, LoggingScopeHandler};
//! use httplog::{HyperTransport, LoggingOptions, Request, RequestHandler, SharedSink, TracingSink};
//! use http::Method;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), httplog::Error> {
//!     tracing_subscriber::fmt::init();
//!
//!     let sink: SharedSink = Arc::new(TracingSink::new().client_name("users-api"));
//!     let options = LoggingOptions::new().redact_headers(["authorization"]);
//!
//!     let inner = LoggingHandler::builder()
//!         .shared_sink(Arc::clone(&sink))
//!         .options(options.clone())
//!         .next(HyperTransport::new())
//!         .build()?;
//!     let client = LoggingScopeHandler::shared(sink, &options, Arc::new(inner));
//!
//!     let req = Request::new(Method::GET, "http://localhost:3000/users/42".parse().unwrap());
//!     let res = client.send(req, CancellationToken::new()).await?;
//!     println!("{}", res.status());
//!     Ok(())
//! }
//! ```

mod content;
mod error;
mod handler;
mod headers;
mod options;
mod request;
mod response;
mod transport;

pub mod middleware;
pub mod sink;

pub use content::Content;
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, FnHandler, RequestHandler, handler_fn};
pub use headers::{HeadersLogValue, Kind, REDACTED, RedactPredicate};
pub use options::LoggingOptions;
pub use request::Request;
pub use response::Response;
pub use sink::{EventId, LogSink, Payload, Record, SharedSink, Stage, TracingSink};
pub use transport::HyperTransport;
