//! Logging middleware.
//!
//! Two handlers, meant to bracket a client's pipeline:
//!
//! ```text
//! LoggingScopeHandler        ← outermost: span + total time incl. retries, auth, …
//!   └─ your handlers …
//!        └─ LoggingHandler   ← innermost: time on the wire, what was really sent
//!             └─ HyperTransport
//! ```
//!
//! Both emit the same four event ids (see [`crate::sink`]) and share
//! [`LoggingOptions`](crate::LoggingOptions) for header redaction. Neither
//! touches the request or the response, and neither catches errors: a
//! failed request logs its start and no end.

mod logging;
mod scope;

pub use logging::{LoggingHandler, LoggingHandlerBuilder};
pub use scope::LoggingScopeHandler;

use std::fmt::Write as _;
use std::time::Duration;

use http::Uri;
use http::header::HeaderName;

use crate::content::Content;
use crate::headers::{HeadersLogValue, Kind};
use crate::request::Request;
use crate::response::Response;
use crate::sink::{EventDescriptor, LogSink, Payload, Stage};

/// Renders the request target for the start record: the absolute form when
/// the URI has a scheme and authority, otherwise whatever was given.
///
/// The absolute form is canonical: lower-case scheme and host, no port when
/// it is the scheme's default, `/` for an empty path.
pub(crate) fn uri_string(uri: Option<&Uri>) -> Option<String> {
    let uri = uri?;
    let (Some(scheme), Some(authority)) = (uri.scheme(), uri.authority()) else {
        return Some(uri.to_string());
    };

    let scheme = scheme.as_str().to_ascii_lowercase();
    let mut target = format!("{scheme}://");
    if let Some((userinfo, _)) = authority.as_str().rsplit_once('@') {
        target.push_str(userinfo);
        target.push('@');
    }
    target.push_str(&authority.host().to_ascii_lowercase());
    if let Some(port) = authority.port_u16().filter(|&port| Some(port) != default_port(&scheme)) {
        let _ = write!(target, ":{port}");
    }
    target.push_str(uri.path_and_query().map_or("/", |pq| pq.as_str()));
    Some(target)
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

/// The four record templates one logging stage emits.
pub(crate) struct Events {
    pub(crate) stage: Stage,
    pub(crate) start: EventDescriptor,
    pub(crate) end: EventDescriptor,
    pub(crate) request_header: EventDescriptor,
    pub(crate) response_header: EventDescriptor,
}

impl Events {
    pub(crate) fn request(
        &self,
        sink: &dyn LogSink,
        req: &Request,
        redact: &(dyn Fn(&HeaderName) -> bool + Send + Sync),
    ) {
        // Checked here so the URI is only rendered when someone will read it.
        if sink.enabled(self.start.level()) {
            self.start.emit(sink, Payload::Start {
                stage: self.stage,
                method: req.method(),
                uri: uri_string(req.uri()),
            });
        }

        if sink.enabled(self.request_header.level()) {
            self.request_header.emit(sink, Payload::Headers(HeadersLogValue::new(
                Kind::Request,
                req.headers(),
                req.body().map(Content::headers),
                redact,
            )));
        }
    }

    pub(crate) fn response(
        &self,
        sink: &dyn LogSink,
        res: &Response,
        elapsed: Duration,
        redact: &(dyn Fn(&HeaderName) -> bool + Send + Sync),
    ) {
        // No guard: the end record always goes through the descriptor's own
        // level check, unlike the start record.
        self.end.emit(sink, Payload::End { stage: self.stage, elapsed, status: res.status() });

        if sink.enabled(self.response_header.level()) {
            self.response_header.emit(sink, Payload::Headers(HeadersLogValue::new(
                Kind::Response,
                res.headers(),
                res.body().map(Content::headers),
                redact,
            )));
        }
    }
}
