//! Fetch tests against an in-process image host.

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;

use briefhub_core::catalog::ChartList;
use briefhub_fetch::client::build_client;
use briefhub_fetch::error::FetchError;
use briefhub_fetch::{fetch_chart, fetch_charts, FetchOptions};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn host() -> Router {
    Router::new()
        .route(
            "/slow.png",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                ([(header::CONTENT_TYPE, "image/png")], b"slow".to_vec())
            }),
        )
        .route(
            "/fast.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], b"fast".to_vec()) }),
        )
        .route("/big.png", get(|| async { vec![0u8; 2048] }))
        .route(
            "/broken.png",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
}

#[tokio::test]
async fn fetch_chart_returns_body_and_content_type() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([format!("{base}/fast.png")]).unwrap();

    let chart = fetch_chart(&client, &list.urls()[0], 1024).await.unwrap();
    assert_eq!(chart.body, b"fast");
    assert_eq!(chart.content_type.as_deref(), Some("image/png"));
    assert_eq!(chart.url, list.urls()[0]);
}

#[tokio::test]
async fn batch_keeps_list_order_when_completion_order_differs() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([
        format!("{base}/slow.png"),
        format!("{base}/fast.png"),
        format!("{base}/fast.png"),
    ])
    .unwrap();

    let options = FetchOptions {
        concurrency: 3,
        ..FetchOptions::default()
    };
    let charts = fetch_charts(&client, &list, options).await.unwrap();

    let bodies: Vec<&[u8]> = charts.iter().map(|c| c.body.as_slice()).collect();
    assert_eq!(bodies, [&b"slow"[..], &b"fast"[..], &b"fast"[..]]);
}

fn assert_send<T: Send>(_: T) {}

#[test]
fn batch_future_is_send() {
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new(["http://127.0.0.1:1/a.png"]).unwrap();
    assert_send(fetch_charts(&client, &list, FetchOptions::default()));
}

#[tokio::test]
async fn sequential_batch_with_zero_concurrency_still_runs() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([format!("{base}/fast.png"), format!("{base}/slow.png")]).unwrap();

    let options = FetchOptions {
        concurrency: 0,
        ..FetchOptions::default()
    };
    let charts = fetch_charts(&client, &list, options).await.unwrap();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[1].body, b"slow");
}

#[tokio::test]
async fn non_success_status_fails_the_whole_batch() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([
        format!("{base}/fast.png"),
        format!("{base}/missing.png"),
        format!("{base}/fast.png"),
    ])
    .unwrap();

    let err = fetch_charts(&client, &list, FetchOptions::default())
        .await
        .unwrap_err();
    match &err {
        FetchError::Status { url, status } => {
            assert_eq!(*status, 404);
            assert!(url.ends_with("/missing.png"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.url().is_some_and(|u| u.ends_with("/missing.png")));
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([format!("{base}/broken.png")]).unwrap();

    let err = fetch_chart(&client, &list.urls()[0], 1024).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([format!("{base}/big.png")]).unwrap();

    let err = fetch_chart(&client, &list.urls()[0], 1024).await.unwrap_err();
    assert!(matches!(err, FetchError::TooLarge { limit: 1024, .. }));
}

#[tokio::test]
async fn timeout_surfaces_as_request_error() {
    let base = serve(host()).await;
    let client = build_client(Duration::from_millis(50)).unwrap();
    let list = ChartList::new([format!("{base}/slow.png")]).unwrap();

    let err = fetch_chart(&client, &list.urls()[0], 1024).await.unwrap_err();
    assert!(matches!(err, FetchError::Request { .. }));
}

#[tokio::test]
async fn unreachable_host_surfaces_as_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = build_client(Duration::from_secs(5)).unwrap();
    let list = ChartList::new([format!("http://{addr}/a.png")]).unwrap();

    let err = fetch_chart(&client, &list.urls()[0], 1024).await.unwrap_err();
    assert!(matches!(err, FetchError::Request { .. }));
}
