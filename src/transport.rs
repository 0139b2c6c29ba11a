//! Hyper-backed transport at the end of a chain.
//!
//! Plain HTTP only: the connector is hyper-util's `HttpConnector`. TLS,
//! pooling policy and redirects are someone else's stage.

use bytes::Bytes;
use http::header::{ALLOW, EXPIRES, HeaderMap, HeaderName, LAST_MODIFIED};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tokio_util::sync::CancellationToken;

use crate::content::Content;
use crate::error::Error;
use crate::handler::{BoxFuture, RequestHandler};
use crate::request::Request;
use crate::response::Response;

type HyperClient = Client<HttpConnector, Full<Bytes>>;

/// Sends requests over the network with hyper's client.
///
/// The call races the caller's [`CancellationToken`]: cancelling it drops the
/// in-flight exchange and fails with [`Error::Cancelled`]. The whole body is
/// read before the response is returned.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self { client: Client::builder(TokioExecutor::new()).build_http() }
    }
}

impl Default for HyperTransport {
    fn default() -> Self { Self::new() }
}

impl RequestHandler for HyperTransport {
    fn send(&self, req: Request, cancel: CancellationToken) -> BoxFuture {
        let client = self.client.clone();
        Box::pin(async move {
            let req = into_hyper(req)?;
            tokio::select! {
                biased;

                () = cancel.cancelled() => Err(Error::Cancelled),
                res = exchange(&client, req) => res,
            }
        })
    }
}

async fn exchange(client: &HyperClient, req: http::Request<Full<Bytes>>) -> Result<Response, Error> {
    let res = client.request(req).await?;
    let (parts, body) = res.into_parts();
    let body = body.collect().await?.to_bytes();

    let (headers, content_headers) = split_content_headers(&parts.headers);
    Ok(Response {
        status: parts.status,
        headers,
        content: Some(Content { headers: content_headers, body }),
    })
}

/// Builds the wire request. Content headers travel with the message headers;
/// on a name clash the content header wins.
fn into_hyper(req: Request) -> Result<http::Request<Full<Bytes>>, Error> {
    let Request { method, uri, mut headers, content } = req;

    let uri = uri.ok_or(Error::InvalidArgument("uri"))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::InvalidArgument("uri"));
    }

    let body = match content {
        Some(content) => {
            headers.extend(content.headers);
            content.body
        }
        None => Bytes::new(),
    };

    let mut out = http::Request::builder().method(method).uri(uri).body(Full::new(body))?;
    *out.headers_mut() = headers;
    Ok(out)
}

fn is_content_header(name: &HeaderName) -> bool {
    name.as_str().starts_with("content-") || *name == EXPIRES || *name == LAST_MODIFIED || *name == ALLOW
}

fn split_content_headers(all: &HeaderMap) -> (HeaderMap, HeaderMap) {
    let mut message = HeaderMap::new();
    let mut content = HeaderMap::new();
    for (name, value) in all {
        let target = if is_content_header(name) { &mut content } else { &mut message };
        target.append(name.clone(), value.clone());
    }
    (message, content)
}
