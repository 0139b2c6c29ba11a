//! Log sink abstraction and the structured records the handlers emit.
//!
//! The handlers never talk to `tracing` directly. They hand a [`Record`] to
//! whatever [`LogSink`] the chain owner injected, which keeps them testable
//! with a capturing sink and lets applications route HTTP client logs
//! somewhere else entirely.
//!
//! [`TracingSink`] is the default and forwards everything to `tracing`
//! under the `httplog` target:
//!
//! ```text
//! INFO httplog: Sending HTTP request GET https://example.com/api event_id=100 event_name="RequestStart"
//! INFO httplog: Received HTTP response headers after 52.1043ms - 200 event_id=101 event_name="RequestEnd"
//! ```
//!
//! Filter on `event_id` / `event_name`; they are stable:
//!
//! | id  | inner handler    | scope handler                    |
//! |-----|------------------|----------------------------------|
//! | 100 | `RequestStart`   | `RequestPipelineStart`           |
//! | 101 | `RequestEnd`     | `RequestPipelineEnd`             |
//! | 102 | `RequestHeader`  | `RequestPipelineRequestHeader`   |
//! | 103 | `ResponseHeader` | `RequestPipelineResponseHeader`  |

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode, Uri};
use tracing::Span;

pub use tracing::Level;

use crate::error::Error;
use crate::headers::HeadersLogValue;

const TARGET: &str = "httplog";

// ── Event identifiers ────────────────────────────────────────────────────────

/// Numeric plus symbolic identity of a log event.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EventId {
    pub id: u32,
    pub name: &'static str,
}

impl EventId {
    pub const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// Event ids emitted by [`LoggingHandler`](crate::middleware::LoggingHandler).
pub mod events {
    use super::EventId;

    pub const REQUEST_START: EventId = EventId::new(100, "RequestStart");
    pub const REQUEST_END: EventId = EventId::new(101, "RequestEnd");
    pub const REQUEST_HEADER: EventId = EventId::new(102, "RequestHeader");
    pub const RESPONSE_HEADER: EventId = EventId::new(103, "ResponseHeader");

    /// Event ids emitted by
    /// [`LoggingScopeHandler`](crate::middleware::LoggingScopeHandler).
    pub mod pipeline {
        use super::EventId;

        pub const START: EventId = EventId::new(100, "RequestPipelineStart");
        pub const END: EventId = EventId::new(101, "RequestPipelineEnd");
        pub const REQUEST_HEADER: EventId = EventId::new(102, "RequestPipelineRequestHeader");
        pub const RESPONSE_HEADER: EventId = EventId::new(103, "RequestPipelineResponseHeader");
    }
}

// ── Payload ──────────────────────────────────────────────────────────────────

/// Which logging stage produced a start or end record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// [`LoggingHandler`](crate::middleware::LoggingHandler), next to the
    /// transport.
    Send,
    /// [`LoggingScopeHandler`](crate::middleware::LoggingScopeHandler), at
    /// the start of the pipeline.
    Pipeline,
}

/// What a record says. Rendered through [`fmt::Display`] only when a sink
/// decides to keep the record.
#[derive(Debug)]
pub enum Payload<'a> {
    /// A request is about to go down the chain.
    Start { stage: Stage, method: &'a Method, uri: Option<String> },
    /// Response headers came back up.
    End { stage: Stage, elapsed: Duration, status: StatusCode },
    /// A request or response header dump.
    Headers(HeadersLogValue<'a>),
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start { stage, method, uri } => {
                let uri = uri.as_deref().unwrap_or("-");
                match stage {
                    Stage::Send => write!(f, "Sending HTTP request {method} {uri}"),
                    Stage::Pipeline => write!(f, "Start processing HTTP request {method} {uri}"),
                }
            }
            Self::End { stage, elapsed, status } => {
                let ms = millis(*elapsed);
                let status = status.as_u16();
                match stage {
                    Stage::Send => {
                        write!(f, "Received HTTP response headers after {ms:.4}ms - {status}")
                    }
                    Stage::Pipeline => {
                        write!(f, "End processing HTTP request after {ms:.4}ms - {status}")
                    }
                }
            }
            Self::Headers(dump) => fmt::Display::fmt(dump, f),
        }
    }
}

/// Fractional milliseconds, the unit the end-of-request events report.
pub fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

// ── Record / LogSink ─────────────────────────────────────────────────────────

/// One structured log event.
#[derive(Debug)]
pub struct Record<'a> {
    pub level: Level,
    pub event: EventId,
    pub payload: &'a Payload<'a>,
    pub error: Option<&'a Error>,
}

/// Receives the records the handlers emit.
///
/// Shared by every request in flight through a handler, hence
/// `Send + Sync`.
pub trait LogSink: Send + Sync + 'static {
    /// Whether records at `level` would be kept. Handlers ask before building
    /// payloads that allocate.
    fn enabled(&self, level: Level) -> bool;

    fn log(&self, record: &Record<'_>);

    /// Opens a scope that covers a whole pass through the pipeline. Sinks
    /// without scopes keep the default, a disabled span.
    fn scope(&self, method: &Method, uri: Option<&Uri>) -> Span {
        let _ = (method, uri);
        Span::none()
    }
}

/// A type-erased sink shared between handlers.
pub type SharedSink = Arc<dyn LogSink>;

/// A prebuilt, immutable record template: level, event id and whether the
/// caller has already checked the level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EventDescriptor {
    level: Level,
    event: EventId,
    skip_enabled_check: bool,
}

impl EventDescriptor {
    pub(crate) const fn new(level: Level, event: EventId) -> Self {
        Self { level, event, skip_enabled_check: false }
    }

    /// For call sites that test `enabled` themselves before building the
    /// payload.
    pub(crate) const fn skip_enabled_check(mut self) -> Self {
        self.skip_enabled_check = true;
        self
    }

    pub(crate) fn level(&self) -> Level { self.level }

    pub(crate) fn emit(&self, sink: &dyn LogSink, payload: Payload<'_>) {
        if !self.skip_enabled_check && !sink.enabled(self.level) {
            return;
        }
        sink.log(&Record { level: self.level, event: self.event, payload: &payload, error: None });
    }
}

// ── TracingSink ──────────────────────────────────────────────────────────────

/// Forwards records to `tracing` under the `httplog` target.
///
/// The subscriber decides what is kept, so `RUST_LOG=httplog=trace` turns
/// on header dumps. An optional client name is attached to every event so
/// several clients can share one subscriber.
#[derive(Clone, Debug, Default)]
pub struct TracingSink {
    client: Option<Arc<str>>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every event with `client = name`.
    pub fn client_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.client = Some(name.into());
        self
    }
}

// `tracing` needs the level as a constant at every callsite, hence one arm
// per level.
macro_rules! event_at {
    ($level:expr, $sink:expr, $record:expr) => {
        tracing::event!(
            target: TARGET,
            $level,
            event_id = $record.event.id,
            event_name = $record.event.name,
            client = $sink.client.as_deref(),
            error = $record.error.map(tracing::field::display),
            "{}",
            $record.payload,
        )
    };
}

impl LogSink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        if level == Level::TRACE {
            tracing::enabled!(target: TARGET, Level::TRACE)
        } else if level == Level::DEBUG {
            tracing::enabled!(target: TARGET, Level::DEBUG)
        } else if level == Level::INFO {
            tracing::enabled!(target: TARGET, Level::INFO)
        } else if level == Level::WARN {
            tracing::enabled!(target: TARGET, Level::WARN)
        } else {
            tracing::enabled!(target: TARGET, Level::ERROR)
        }
    }

    fn log(&self, record: &Record<'_>) {
        let level = record.level;
        if level == Level::TRACE {
            event_at!(Level::TRACE, self, record);
        } else if level == Level::DEBUG {
            event_at!(Level::DEBUG, self, record);
        } else if level == Level::INFO {
            event_at!(Level::INFO, self, record);
        } else if level == Level::WARN {
            event_at!(Level::WARN, self, record);
        } else {
            event_at!(Level::ERROR, self, record);
        }
    }

    fn scope(&self, method: &Method, uri: Option<&Uri>) -> Span {
        tracing::info_span!(
            target: TARGET,
            "http_request",
            method = %method,
            uri = uri.map(tracing::field::display),
            client = self.client.as_deref(),
        )
    }
}
