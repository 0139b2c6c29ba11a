mod common;

use std::sync::Arc;
use std::time::Duration;

use common::CaptureSink;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ETAG, HeaderValue};
use http::{Method, StatusCode};
use httplog::middleware::LoggingHandler;
use httplog::sink::Level;
use httplog::{Content, Error, LoggingOptions, Request, RequestHandler, Response, handler_fn};
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;

fn get(uri: &str) -> Request {
    Request::new(Method::GET, uri.parse().unwrap())
}

/// Answers 200 after `delay`.
fn ok_after(delay: Duration) -> impl RequestHandler {
    handler_fn(move |_req, _cancel| async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Error>(Response::new(StatusCode::OK))
    })
}

#[tokio::test(start_paused = true)]
async fn logs_start_and_end_around_forwarded_call() {
    let sink = CaptureSink::new(LevelFilter::INFO);
    let handler = LoggingHandler::new(sink.clone(), ok_after(Duration::from_millis(50)));

    let res = handler.send(get("https://example.com/api"), CancellationToken::new()).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let records = sink.records();
    assert_eq!(sink.event_ids(), [100, 101]);

    let start = &records[0];
    assert_eq!(start.level, Level::INFO);
    assert_eq!(start.event.name, "RequestStart");
    assert_eq!(start.method, Some(Method::GET));
    assert_eq!(start.uri.as_deref(), Some("https://example.com/api"));
    assert_eq!(start.message, "Sending HTTP request GET https://example.com/api");

    let end = &records[1];
    assert_eq!(end.level, Level::INFO);
    assert_eq!(end.event.name, "RequestEnd");
    assert_eq!(end.status, Some(StatusCode::OK));
    assert!(end.elapsed.unwrap() >= Duration::from_millis(50));
    assert!(end.message.starts_with("Received HTTP response headers after "), "{}", end.message);
    assert!(end.message.ends_with("ms - 200"), "{}", end.message);
}

#[tokio::test(start_paused = true)]
async fn trace_level_adds_header_dumps() {
    let sink = CaptureSink::new(LevelFilter::TRACE);
    let next = handler_fn(|_req, _cancel| async {
        Ok::<_, Error>(
            Response::new(StatusCode::OK)
                .header(ETAG, HeaderValue::from_static("\"v1\""))
                .content(Content::new("{}").header(CONTENT_TYPE, HeaderValue::from_static("application/json"))),
        )
    });
    let handler = LoggingHandler::new(sink.clone(), next);

    let req = get("https://example.com/api").header(ACCEPT, HeaderValue::from_static("application/json"));
    handler.send(req, CancellationToken::new()).await.unwrap();

    assert_eq!(sink.event_ids(), [100, 102, 101, 103]);
    assert!(sink.records().iter().filter(|r| r.event.id >= 102).all(|r| r.level == Level::TRACE));
    assert_eq!(sink.message(102), "Request Headers:\naccept: application/json\n");
    assert_eq!(
        sink.message(103),
        "Response Headers:\netag: \"v1\"\nContent Headers:\ncontent-type: application/json\n",
    );
}

#[tokio::test]
async fn redacts_flagged_header_values() {
    let sink = CaptureSink::new(LevelFilter::TRACE);
    let options = LoggingOptions::new().redact_headers(["Authorization"]);
    let handler = LoggingHandler::with_options(sink.clone(), options, ok_after(Duration::ZERO));

    let req = get("https://example.com/api")
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"))
        .header(ACCEPT, HeaderValue::from_static("*/*"));
    handler.send(req, CancellationToken::new()).await.unwrap();

    let dump = sink.message(102);
    assert!(dump.contains("authorization: *\n"), "{dump}");
    assert!(dump.contains("accept: */*\n"), "{dump}");
    assert!(!dump.contains("Bearer xyz"), "{dump}");
}

#[tokio::test]
async fn redact_with_matches_header_names_regardless_of_case() {
    let sink = CaptureSink::new(LevelFilter::TRACE);
    let options = LoggingOptions::new().redact_with(|name| name == "Authorization");
    let handler = LoggingHandler::with_options(sink.clone(), options, ok_after(Duration::ZERO));

    let req = get("https://example.com/api").header(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
    handler.send(req, CancellationToken::new()).await.unwrap();

    let dump = sink.message(102);
    assert_eq!(dump, "Request Headers:\nauthorization: *\n");
}

#[tokio::test]
async fn header_dump_is_never_rendered_below_trace() {
    let sink = CaptureSink::new(LevelFilter::INFO);
    let options = LoggingOptions::new().redact_with(|_| panic!("header dump rendered"));
    let handler = LoggingHandler::with_options(sink.clone(), options, ok_after(Duration::ZERO));

    let req = get("https://example.com/api").header(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
    handler.send(req, CancellationToken::new()).await.unwrap();

    assert_eq!(sink.event_ids(), [100, 101]);
}

#[tokio::test]
async fn nothing_is_emitted_below_info() {
    let sink = CaptureSink::new(LevelFilter::WARN);
    let handler = LoggingHandler::new(sink.clone(), ok_after(Duration::ZERO));

    let res = handler.send(get("https://example.com/api"), CancellationToken::new()).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn relative_and_missing_uris_are_logged_raw() {
    let sink = CaptureSink::new(LevelFilter::INFO);
    let handler = LoggingHandler::new(sink.clone(), ok_after(Duration::ZERO));

    handler.send(get("/api?x=1"), CancellationToken::new()).await.unwrap();
    handler.send(Request::without_uri(Method::DELETE), CancellationToken::new()).await.unwrap();

    let records = sink.records();
    assert_eq!(records[0].uri.as_deref(), Some("/api?x=1"));
    assert_eq!(records[2].uri, None);
    assert_eq!(records[2].message, "Sending HTTP request DELETE -");
}

#[tokio::test(start_paused = true)]
async fn cancellation_propagates_without_end_record() {
    let sink = CaptureSink::new(LevelFilter::TRACE);
    let next = handler_fn(|_req, cancel: CancellationToken| async move {
        cancel.cancelled().await;
        Err::<Response, _>(Error::Cancelled)
    });
    let handler = LoggingHandler::new(sink.clone(), next);

    let token = CancellationToken::new();
    let (res, ()) = tokio::join!(handler.send(get("https://example.com/api"), token.clone()), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
    });

    assert!(matches!(res, Err(Error::Cancelled)));
    assert_eq!(sink.event_ids(), [100, 102]);
    assert!(sink.records().iter().all(|r| r.event.name != "RequestEnd"));
}

#[tokio::test]
async fn transport_errors_pass_through_unchanged() {
    let sink = CaptureSink::new(LevelFilter::INFO);
    let next = handler_fn(|_req, _cancel| async {
        Err::<Response, _>(Error::transport("connection refused"))
    });
    let handler = LoggingHandler::new(sink.clone(), next);

    let err = handler.send(get("https://example.com/api"), CancellationToken::new()).await.unwrap_err();

    assert_eq!(err.to_string(), "transport: connection refused");
    assert_eq!(sink.event_ids(), [100]);
}

#[tokio::test]
async fn request_and_response_pass_through_untouched() {
    let sink = CaptureSink::new(LevelFilter::TRACE);
    let next = handler_fn(|req: Request, _cancel| async move {
        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer xyz");
        assert_eq!(req.body().map(|c| &c.body()[..]), Some(&b"payload"[..]));
        Ok::<_, Error>(Response::new(StatusCode::CREATED).header(ETAG, HeaderValue::from_static("\"1\"")))
    });
    let options = LoggingOptions::new().redact_headers(["authorization"]);
    let handler = LoggingHandler::with_options(sink, options, next);

    let req = Request::new(Method::POST, "https://example.com/users".parse().unwrap())
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"))
        .content(Content::new("payload"));
    let res = handler.send(req, CancellationToken::new()).await.unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()[ETAG], "\"1\"");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_instance_serves_concurrent_requests() {
    let sink = CaptureSink::new(LevelFilter::INFO);
    let handler = Arc::new(LoggingHandler::new(sink.clone(), ok_after(Duration::from_millis(5))));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16 {
        let handler = Arc::clone(&handler);
        tasks.spawn(async move {
            handler.send(get(&format!("https://example.com/items/{i}")), CancellationToken::new()).await
        });
    }
    while let Some(res) = tasks.join_next().await {
        assert_eq!(res.unwrap().unwrap().status(), StatusCode::OK);
    }

    let ids = sink.event_ids();
    assert_eq!(ids.iter().filter(|&&id| id == 100).count(), 16);
    assert_eq!(ids.iter().filter(|&&id| id == 101).count(), 16);
}

#[test]
fn builder_requires_sink_and_next() {
    let no_sink = LoggingHandler::builder().next(ok_after(Duration::ZERO)).build();
    assert!(matches!(no_sink, Err(Error::InvalidArgument("sink"))));

    let no_next = LoggingHandler::builder().sink(CaptureSink::new(LevelFilter::INFO)).build();
    assert!(matches!(no_next, Err(Error::InvalidArgument("next"))));

    let built = LoggingHandler::builder()
        .sink(CaptureSink::new(LevelFilter::INFO))
        .options(LoggingOptions::new())
        .next(ok_after(Duration::ZERO))
        .build();
    assert!(built.is_ok());
}
