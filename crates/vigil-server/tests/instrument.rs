#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::panic::AssertUnwindSafe;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Router,
};
use futures_util::FutureExt;
use tower::ServiceExt;

use vigil_core::{HttpMetrics, MetricRegistry};
use vigil_server::obs::instrument_route;

fn metrics() -> (MetricRegistry, HttpMetrics) {
    let mut registry = MetricRegistry::new();
    let http = HttpMetrics::register(&mut registry).unwrap();
    (registry, http)
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

async fn body_only() -> &'static str {
    "just a body"
}

async fn teapot_with_headers() -> impl IntoResponse {
    (
        StatusCode::IM_A_TEAPOT,
        [(header::CACHE_CONTROL, "no-store"), (header::CONTENT_TYPE, "text/x-tea")],
        "short and stout",
    )
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn records_explicit_error_status() {
    let (registry, http) = metrics();
    let app = Router::new().route("/whatever", instrument_route("/missing", &http, get(missing)));

    let resp = app.oneshot(get_req("/whatever")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"not found");

    // Labeled with the route label, not the request path.
    assert_eq!(http.request_count("GET", "/missing", "Not Found"), 1);
    assert_eq!(http.request_count("GET", "/whatever", "Not Found"), 0);
    assert_eq!(http.request_count("GET", "/missing", "OK"), 0);
    assert_eq!(http.duration_count("GET", "/missing"), 1);

    let rendered = registry.render();
    assert_eq!(rendered.matches("http_requests_total{").count(), 1);
}

#[tokio::test]
async fn body_without_status_records_ok() {
    let (_registry, http) = metrics();
    let app = Router::new().route("/b", instrument_route("/b", &http, get(body_only)));

    let resp = app.oneshot(get_req("/b")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(http.request_count("GET", "/b", "OK"), 1);
}

#[tokio::test]
async fn wrapping_is_transparent() {
    let (_registry, http) = metrics();
    let plain = Router::new().route("/t", get(teapot_with_headers));
    let wrapped =
        Router::new().route("/t", instrument_route("/t", &http, get(teapot_with_headers)));

    let a = plain.oneshot(get_req("/t")).await.unwrap();
    let b = wrapped.oneshot(get_req("/t")).await.unwrap();

    assert_eq!(a.status(), b.status());
    assert_eq!(a.headers(), b.headers());
    let a_body = to_bytes(a.into_body(), usize::MAX).await.unwrap();
    let b_body = to_bytes(b.into_body(), usize::MAX).await.unwrap();
    assert_eq!(a_body, b_body);

    assert_eq!(http.request_count("GET", "/t", "I'm a teapot"), 1);
}

#[tokio::test]
async fn method_label_comes_from_request() {
    let (_registry, http) = metrics();
    let app = Router::new().route(
        "/items",
        instrument_route("/items", &http, get(body_only).post(body_only)),
    );

    app.clone().oneshot(get_req("/items")).await.unwrap();
    let post_req = Request::builder()
        .method(Method::POST)
        .uri("/items")
        .body(Body::empty())
        .unwrap();
    app.oneshot(post_req).await.unwrap();

    assert_eq!(http.request_count("GET", "/items", "OK"), 1);
    assert_eq!(http.request_count("POST", "/items", "OK"), 1);
}

#[tokio::test]
async fn any_method_router_can_be_wrapped() {
    let (_registry, http) = metrics();
    let app = Router::new().route("/any", instrument_route("/any", &http, any(body_only)));

    for method in [Method::GET, Method::DELETE, Method::PATCH] {
        let req = Request::builder()
            .method(method)
            .uri("/any")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(http.request_count("GET", "/any", "OK"), 1);
    assert_eq!(http.request_count("DELETE", "/any", "OK"), 1);
    assert_eq!(http.request_count("PATCH", "/any", "OK"), 1);
}

#[tokio::test]
async fn rejected_method_is_recorded_with_its_status() {
    let (_registry, http) = metrics();
    let app = Router::new().route("/g", instrument_route("/g", &http, get(body_only)));

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/g")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(http.request_count("PUT", "/g", "Method Not Allowed"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invocations_are_all_counted() {
    const N: u64 = 200;
    let (_registry, http) = metrics();
    let app = Router::new().route("/x", instrument_route("/x", &http, get(body_only)));

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { app.oneshot(get_req("/x")).await.unwrap().status() })
        })
        .collect();
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(http.request_count("GET", "/x", "OK"), N);
    assert_eq!(http.duration_count("GET", "/x"), N);
}

#[tokio::test]
async fn panicking_handler_is_recorded_and_still_panics() {
    let (_registry, http) = metrics();
    let app = Router::new().route("/boom", instrument_route("/boom", &http, get(boom)));

    let outcome = AssertUnwindSafe(app.oneshot(get_req("/boom")))
        .catch_unwind()
        .await;
    assert!(outcome.is_err(), "panic must propagate past the wrapper");

    assert_eq!(http.request_count("GET", "/boom", "Internal Server Error"), 1);
    assert_eq!(http.duration_count("GET", "/boom"), 1);
}

#[tokio::test]
async fn scrape_output_is_stable_between_recordings() {
    let (registry, http) = metrics();
    let app = Router::new().route("/s", instrument_route("/s", &http, get(body_only)));
    app.oneshot(get_req("/s")).await.unwrap();

    assert_eq!(registry.render(), registry.render());
}
