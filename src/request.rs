//! Outgoing HTTP request type.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Uri};

use crate::content::Content;

/// An outgoing HTTP request as it travels down a handler chain.
///
/// ```rust
/// use httplog::{Content, Request};
/// use http::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
/// use http::Method;
///
/// let req = Request::new(Method::POST, "https://example.com/users".parse().unwrap())
///     .header(ACCEPT, HeaderValue::from_static("application/json"))
///     .content(
///         Content::new(r#"{"name":"alice"}"#)
///             .header(CONTENT_TYPE, HeaderValue::from_static("application/json")),
///     );
/// assert_eq!(*req.method(), Method::POST);
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Option<Uri>,
    pub(crate) headers: HeaderMap,
    pub(crate) content: Option<Content>,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self { method, uri: Some(uri), headers: HeaderMap::new(), content: None }
    }

    /// A request whose target has not been set yet. A base-address stage
    /// further down the chain is expected to fill it in.
    pub fn without_uri(method: Method) -> Self {
        Self { method, uri: None, headers: HeaderMap::new(), content: None }
    }

    /// Appends a header. Repeated names keep every value, in order.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> Option<&Uri> { self.uri.as_ref() }
    pub fn uri_mut(&mut self) -> &mut Option<Uri> { &mut self.uri }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> Option<&Content> { self.content.as_ref() }
}
