//! Message body together with its own header collection.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// A request or response body plus the headers that describe it
/// (`content-type`, `content-length`, …).
///
/// Content headers live apart from the message headers so that logging can
/// show them as their own section.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Content {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self { headers: HeaderMap::new(), body: body.into() }
    }

    /// Appends a content header. Returns `self` for chaining.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> &Bytes { &self.body }
}
