//! Incoming HTTP response type.
//!
//! Responses come back up the chain from the transport. Handlers that only
//! observe traffic, like the logging middleware, hand them on unchanged.

use http::StatusCode;
use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::content::Content;

/// An HTTP response received from the end of a handler chain.
///
/// ```rust
/// use httplog::{Content, Response};
/// use http::StatusCode;
/// use http::header::{CONTENT_TYPE, HeaderValue};
///
/// let res = Response::new(StatusCode::OK)
///     .content(
///         Content::new("ok")
///             .header(CONTENT_TYPE, HeaderValue::from_static("text/plain")),
///     );
/// assert_eq!(res.status(), StatusCode::OK);
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) content: Option<Content>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), content: None }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> Option<&Content> { self.content.as_ref() }
}
