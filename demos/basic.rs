//! Minimal httplog example: a scope handler, a logging handler and the hyper
//! transport, logging through `tracing`.
//!
//! Run with:
//!   RUST_LOG=httplog=info cargo run --example basic
//!
//! Header dumps (with `authorization` redacted):
//!   RUST_LOG=httplog=trace cargo run --example basic -- http://localhost:3000/users/42

use std::sync::Arc;

use http::Method;
use http::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use httplog::middleware::{LoggingHandler, LoggingScopeHandler};
use httplog::{HyperTransport, LoggingOptions, Request, RequestHandler, SharedSink, TracingSink};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let target = std::env::args().nth(1).unwrap_or_else(|| "http://example.com/".to_owned());

    let sink: SharedSink = Arc::new(TracingSink::new().client_name("demo"));
    let options = LoggingOptions::new().redact_headers(["authorization"]);

    // Outermost first: scope → logging → transport.
    let inner = LoggingHandler::builder()
        .shared_sink(Arc::clone(&sink))
        .options(options.clone())
        .next(HyperTransport::new())
        .build()
        .expect("logging handler");
    let client = LoggingScopeHandler::shared(sink, &options, Arc::new(inner));

    let req = Request::new(Method::GET, target.parse().expect("invalid URI"))
        .header(ACCEPT, HeaderValue::from_static("*/*"))
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-real-token"));

    // Ctrl-C cancels the in-flight request.
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    match client.send(req, cancel).await {
        Ok(res) => {
            let size = res.body().map_or(0, |c| c.body().len());
            println!("{} ({size} bytes)", res.status());
        }
        Err(e) => eprintln!("request failed: {e}"),
    }
}
