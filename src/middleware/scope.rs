//! Pipeline-wide logging scope at the outer end of the chain.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, RequestHandler};
use crate::headers::RedactPredicate;
use crate::options::LoggingOptions;
use crate::request::Request;
use crate::sink::{EventDescriptor, Level, LogSink, SharedSink, Stage, events::pipeline};

use super::Events;

const EVENTS: Events = Events {
    stage: Stage::Pipeline,
    start: EventDescriptor::new(Level::INFO, pipeline::START).skip_enabled_check(),
    end: EventDescriptor::new(Level::INFO, pipeline::END),
    request_header: EventDescriptor::new(Level::TRACE, pipeline::REQUEST_HEADER).skip_enabled_check(),
    response_header: EventDescriptor::new(Level::TRACE, pipeline::RESPONSE_HEADER).skip_enabled_check(),
};

/// Opens a scope around the whole pipeline and logs what enters and leaves it.
///
/// Place it first. The span from [`LogSink::scope`] stays entered for every
/// stage below, so logs written by those stages (the inner
/// [`LoggingHandler`](super::LoggingHandler) included) carry the method and
/// URI. Timing covers everything downstream: retries, token refreshes,
/// queueing.
///
/// With [`TracingSink`](crate::TracingSink) the scope is a span named
/// `http_request`; method, URI and client name are its fields.
pub struct LoggingScopeHandler {
    sink: SharedSink,
    redact: RedactPredicate,
    next: BoxedHandler,
}

impl LoggingScopeHandler {
    pub fn new(sink: impl LogSink, next: impl RequestHandler) -> Self {
        Self::with_options(sink, LoggingOptions::default(), next)
    }

    pub fn with_options(sink: impl LogSink, options: LoggingOptions, next: impl RequestHandler) -> Self {
        Self::shared(Arc::new(sink), &options, Arc::new(next))
    }

    /// Builds from parts already shared with other handlers, typically the
    /// same sink as the inner [`LoggingHandler`](super::LoggingHandler).
    pub fn shared(sink: SharedSink, options: &LoggingOptions, next: BoxedHandler) -> Self {
        Self { sink, redact: options.resolve_redaction(), next }
    }
}

impl RequestHandler for LoggingScopeHandler {
    fn send(&self, req: Request, cancel: CancellationToken) -> BoxFuture {
        let span = self.sink.scope(req.method(), req.uri());
        let sink = Arc::clone(&self.sink);
        let redact = Arc::clone(&self.redact);
        let next = Arc::clone(&self.next);

        Box::pin(
            async move {
                EVENTS.request(&*sink, &req, &*redact);

                let started = Instant::now();
                let response = next.send(req, cancel).await?;
                let elapsed = started.elapsed();

                EVENTS.response(&*sink, &response, elapsed, &*redact);
                Ok::<_, Error>(response)
            }
            .instrument(span),
        )
    }
}
