//! Request-lifecycle logging next to the transport.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, RequestHandler};
use crate::headers::RedactPredicate;
use crate::options::LoggingOptions;
use crate::request::Request;
use crate::sink::{EventDescriptor, Level, LogSink, SharedSink, Stage, events};

use super::Events;

const EVENTS: Events = Events {
    stage: Stage::Send,
    start: EventDescriptor::new(Level::INFO, events::REQUEST_START).skip_enabled_check(),
    end: EventDescriptor::new(Level::INFO, events::REQUEST_END),
    request_header: EventDescriptor::new(Level::TRACE, events::REQUEST_HEADER).skip_enabled_check(),
    response_header: EventDescriptor::new(Level::TRACE, events::RESPONSE_HEADER).skip_enabled_check(),
};

/// Logs the start, end, round-trip time and headers of every request that
/// passes through it.
///
/// Place it last, right before the transport, so the logged headers and the
/// measured time are what actually went over the wire.
///
/// | Event | Level | When |
/// |---|---|---|
/// | `RequestStart` (100) | INFO | before forwarding: method, URI |
/// | `RequestHeader` (102) | TRACE | before forwarding: request + content headers |
/// | `RequestEnd` (101) | INFO | after the response: elapsed ms, status |
/// | `ResponseHeader` (103) | TRACE | after the response: response + content headers |
///
/// Errors from the next handler, cancellation included, are returned as-is
/// and produce no `RequestEnd`.
///
/// ```rust,no_run
/// use httplog::middleware::LoggingHandler;
/// use httplog::{HyperTransport, LoggingOptions, TracingSink};
///
/// let handler = LoggingHandler::with_options(
///     TracingSink::new(),
///     LoggingOptions::new().redact_headers(["authorization"]),
///     HyperTransport::new(),
/// );
/// ```
pub struct LoggingHandler {
    sink: SharedSink,
    redact: RedactPredicate,
    next: BoxedHandler,
}

impl LoggingHandler {
    /// Logs to `sink` and never redacts header values.
    pub fn new(sink: impl LogSink, next: impl RequestHandler) -> Self {
        Self::with_options(sink, LoggingOptions::default(), next)
    }

    pub fn with_options(sink: impl LogSink, options: LoggingOptions, next: impl RequestHandler) -> Self {
        Self::from_parts(Arc::new(sink), &options, Arc::new(next))
    }

    pub fn builder() -> LoggingHandlerBuilder {
        LoggingHandlerBuilder::default()
    }

    fn from_parts(sink: SharedSink, options: &LoggingOptions, next: BoxedHandler) -> Self {
        Self { sink, redact: options.resolve_redaction(), next }
    }
}

impl RequestHandler for LoggingHandler {
    fn send(&self, req: Request, cancel: CancellationToken) -> BoxFuture {
        let sink = Arc::clone(&self.sink);
        let redact = Arc::clone(&self.redact);
        let next = Arc::clone(&self.next);

        Box::pin(async move {
            EVENTS.request(&*sink, &req, &*redact);

            let started = Instant::now();
            let response = next.send(req, cancel).await?;
            let elapsed = started.elapsed();

            EVENTS.response(&*sink, &response, elapsed, &*redact);
            Ok(response)
        })
    }
}

/// Fallible construction for call sites that gather the parts separately.
///
/// ```rust
/// use httplog::middleware::LoggingHandler;
/// use httplog::{Error, Response, TracingSink, handler_fn};
/// use http::StatusCode;
///
/// let built = LoggingHandler::builder()
///     .sink(TracingSink::new())
///     .next(handler_fn(|_req, _cancel| async { Ok::<_, Error>(Response::new(StatusCode::OK)) }))
///     .build();
/// assert!(built.is_ok());
///
/// let missing = LoggingHandler::builder().sink(TracingSink::new()).build();
/// assert!(matches!(missing, Err(Error::InvalidArgument("next"))));
/// ```
#[derive(Default)]
pub struct LoggingHandlerBuilder {
    sink: Option<SharedSink>,
    options: Option<LoggingOptions>,
    next: Option<BoxedHandler>,
}

impl LoggingHandlerBuilder {
    pub fn sink(self, sink: impl LogSink) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    /// Uses a sink that is already shared with other handlers.
    pub fn shared_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn options(mut self, options: LoggingOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn next(self, next: impl RequestHandler) -> Self {
        self.shared_next(Arc::new(next))
    }

    pub fn shared_next(mut self, next: BoxedHandler) -> Self {
        self.next = Some(next);
        self
    }

    /// Fails with [`Error::InvalidArgument`] naming the first missing part.
    pub fn build(self) -> Result<LoggingHandler, Error> {
        let sink = self.sink.ok_or(Error::InvalidArgument("sink"))?;
        let next = self.next.ok_or(Error::InvalidArgument("next"))?;
        let options = self.options.unwrap_or_default();
        Ok(LoggingHandler::from_parts(sink, &options, next))
    }
}
