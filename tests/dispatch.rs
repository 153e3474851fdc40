//! Continuation-convention dispatch behaviour.

mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};
use common::*;
use trail_router::routing::{CachedCompiler, RegexCompiler};
use trail_router::{create_dispatcher, ContinuationHandler, DispatchError, Next, Outcome, TrailRequest};

fn get(path: &str) -> TrailRequest {
    TrailRequest::get(path).unwrap()
}

fn status_of(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Respond(res) => res.status(),
        Outcome::PassThrough => panic!("expected a response, got pass-through"),
    }
}

#[tokio::test]
async fn test_first_matching_group_wins() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register("/a/:id", responding(&l, "first", StatusCode::OK));
        trail.register("/a/1", responding(&l, "second", StatusCode::ACCEPTED));
    });

    let outcome = dispatcher.dispatch(&get("/a/1")).await.unwrap();
    assert_eq!(status_of(outcome), StatusCode::OK);
    assert_eq!(log.labels(), vec!["first"]);
}

#[tokio::test]
async fn test_group_runs_once_when_several_patterns_match() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register(["/test", "/:any", "/*rest"], advancing(&l, "group"));
    });

    let outcome = dispatcher.dispatch(&get("/test")).await.unwrap();
    assert!(matches!(outcome, Outcome::PassThrough));
    assert_eq!(log.count("group"), 1);
}

#[tokio::test]
async fn test_no_match_passes_through() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register("/nomatch", responding(&l, "handler", StatusCode::OK));
    });

    let outcome = dispatcher.dispatch(&get("/test")).await.unwrap();
    assert!(outcome.is_pass_through());
    assert!(outcome.into_response().headers().contains_key("x-middleware-next"));
    assert!(log.labels().is_empty());
}

#[tokio::test]
async fn test_response_short_circuits_chain() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register(
            "/admin",
            vec![
                responding(&l, "auth", StatusCode::UNAUTHORIZED),
                advancing(&l, "after"),
            ],
        );
    });

    let outcome = dispatcher.dispatch(&get("/admin")).await.unwrap();
    assert_eq!(status_of(outcome), StatusCode::UNAUTHORIZED);
    assert_eq!(log.labels(), vec!["auth"]);
}

#[tokio::test]
async fn test_chain_continues_with_original_request() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register(
            "/multi",
            vec![
                advancing(&l, "one"),
                advancing(&l, "two"),
                responding(&l, "three", StatusCode::TEMPORARY_REDIRECT),
            ],
        );
    });

    let request = get("/multi");
    let outcome = dispatcher.dispatch(&request).await.unwrap();
    assert_eq!(status_of(outcome), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(log.labels(), vec!["one", "two", "three"]);

    for label in ["one", "two", "three"] {
        let seen = log.requests(label);
        assert!(seen[0].same_request(&request), "{label} saw another request");
    }
}

#[tokio::test]
async fn test_exhausted_chain_passes_through() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register("/a", [advancing(&l, "one"), advancing(&l, "two")]);
    });

    let outcome = dispatcher.dispatch(&get("/a")).await.unwrap();
    assert!(matches!(outcome, Outcome::PassThrough));
    assert_eq!(log.labels(), vec!["one", "two"]);
}

#[tokio::test]
async fn test_silent_handler_is_a_protocol_violation() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register(
            "/test",
            vec![advancing(&l, "one"), silent(&l, "two"), advancing(&l, "three")],
        );
    });

    let err = dispatcher.dispatch(&get("/test")).await.unwrap_err();
    assert!(matches!(
        err,
        DispatchError::ProtocolViolation { handler: 1, ref pattern } if pattern == "/test"
    ));
    assert!(err.to_string().contains("did not complete gracefully"));
    assert_eq!(log.labels(), vec!["one", "two"]);
}

#[tokio::test]
async fn test_invalid_pattern_fails_only_when_reached() {
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register("/ok", responding(&l, "ok", StatusCode::OK));
        trail.register("/bad(", responding(&l, "bad", StatusCode::OK));
    });

    assert!(dispatcher.dispatch(&get("/ok")).await.is_ok());

    let err = dispatcher.dispatch(&get("/other")).await.unwrap_err();
    assert!(matches!(err, DispatchError::Pattern(ref e) if e.pattern == "/bad("));
    assert_eq!(err.kind(), "pattern_error");
    assert_eq!(log.labels(), vec!["ok"]);
}

#[tokio::test]
async fn test_each_dispatch_runs_setup_into_a_fresh_registry() {
    let generations = Arc::new(AtomicUsize::new(0));
    let g = Arc::clone(&generations);
    let dispatcher = create_dispatcher(move |trail, _| {
        let generation = g.fetch_add(1, Ordering::SeqCst);
        trail.register("/gen", generation_handler(generation));
    });

    for expected in 0..3 {
        let outcome = dispatcher.dispatch(&get("/gen")).await.unwrap();
        assert_eq!(generation_of(outcome), expected);
    }
    assert_eq!(generations.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_concurrent_dispatches_are_isolated() {
    const TASKS: usize = 32;

    let generations = Arc::new(AtomicUsize::new(0));
    let g = Arc::clone(&generations);
    let hook = create_dispatcher(move |trail, _| {
        let generation = g.fetch_add(1, Ordering::SeqCst);
        trail.register("/item/:id", generation_handler(generation));
    })
    .into_hook();

    let mut tasks = Vec::with_capacity(TASKS);
    for i in 0..TASKS {
        let hook = hook.clone();
        tasks.push(tokio::spawn(async move {
            hook(get(&format!("/item/{i}"))).await
        }));
    }

    let mut seen = HashSet::new();
    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert!(seen.insert(generation_of(outcome)));
    }

    assert_eq!(seen.len(), TASKS);
    assert_eq!(generations.load(Ordering::SeqCst), TASKS);
}

#[tokio::test]
async fn test_shared_cache_compiles_lazily() {
    let cache = Arc::new(CachedCompiler::new(RegexCompiler::default()));
    let log = CallLog::new();
    let l = log.clone();
    let dispatcher = create_dispatcher(move |trail, _| {
        trail.register(["/a", "/b"], responding(&l, "ab", StatusCode::OK));
        trail.register("/c", responding(&l, "c", StatusCode::OK));
    })
    .with_compiler(cache.clone());

    dispatcher.dispatch(&get("/a")).await.unwrap();
    assert_eq!(cache.len(), 1);

    dispatcher.dispatch(&get("/c")).await.unwrap();
    dispatcher.dispatch(&get("/c")).await.unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(log.labels(), vec!["ab", "c", "c"]);
}

#[tokio::test]
async fn test_handlers_can_read_request_headers() {
    let dispatcher = create_dispatcher(|trail, _| {
        trail.register(
            "/secure/*rest",
            ContinuationHandler::new(|req: TrailRequest, next: Next| async move {
                match req.header("authorization") {
                    Some(_) => {
                        next.advance();
                        None
                    }
                    None => Some(status(StatusCode::UNAUTHORIZED)),
                }
            }),
        );
    });

    let anonymous = dispatcher.dispatch(&get("/secure/a/b")).await.unwrap();
    assert_eq!(status_of(anonymous), StatusCode::UNAUTHORIZED);

    let mut headers = axum::http::HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_static("Bearer t"));
    let authed = TrailRequest::new(
        axum::http::Method::GET,
        "/secure/a/b".parse().unwrap(),
        headers,
    );
    assert!(dispatcher.dispatch(&authed).await.unwrap().is_pass_through());
}

fn generation_handler(generation: usize) -> ContinuationHandler {
    ContinuationHandler::new(move |_req: TrailRequest, _next: Next| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let mut res = status(StatusCode::OK);
        res.headers_mut()
            .insert("x-generation", HeaderValue::from(generation));
        Some(res)
    })
}

fn generation_of(outcome: Outcome) -> usize {
    let res = outcome.into_response();
    res.headers()["x-generation"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap()
}
