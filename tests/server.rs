//! Integration tests for the HTTP server, status endpoint, and graceful shutdown.

mod common;

use rotor::pool::Backend;
use rotor::status::StatusResponse;

use common::{backend_tag, mark_all_healthy, spawn_backend, spawn_balancer, BalancerOptions};

const STATUS_PATH: &str = "/__rotor/status";

fn with_status() -> BalancerOptions<'static> {
    BalancerOptions {
        status_path: Some(STATUS_PATH),
        ..BalancerOptions::default()
    }
}

#[tokio::test]
async fn status_endpoint_reports_pool_state() {
    let a = spawn_backend("a").await;
    let b = spawn_backend("b").await;
    let lb = spawn_balancer(&[a.url(), b.url()], with_status()).await;
    lb.pool.publish(&[Backend::parse(&a.url()).unwrap()]).await;

    let resp = reqwest::get(lb.url(STATUS_PATH)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let status: StatusResponse = resp.json().await.unwrap();
    assert_eq!(status.status, "degraded");
    assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(status.pool.registered, 2);
    assert_eq!(status.pool.healthy, 1);
    assert_eq!(status.pool.probe_cycles, 1);
    assert!(status.pool.last_cycle_ago_seconds.is_some());

    assert_eq!(status.pool.backends.len(), 2);
    assert_eq!(status.pool.backends[0].url, a.url());
    assert!(status.pool.backends[0].healthy);
    assert_eq!(status.pool.backends[1].url, b.url());
    assert!(!status.pool.backends[1].healthy);

    // Serving status is not a forward.
    assert!(a.seen().is_empty());
    assert_eq!(status.pool.selections, 0);

    lb.stop().await;
}

#[tokio::test]
async fn status_before_first_cycle_is_unavailable() {
    let a = spawn_backend("a").await;
    let lb = spawn_balancer(&[a.url()], with_status()).await;

    let status: StatusResponse = reqwest::get(lb.url(STATUS_PATH))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status.status, "unavailable");
    assert_eq!(status.pool.probe_cycles, 0);
    assert!(status.pool.last_cycle_ago_seconds.is_none());

    lb.stop().await;
}

#[tokio::test]
async fn request_counters_track_outcomes() {
    let a = spawn_backend("a").await;
    let lb = spawn_balancer(&[a.url()], with_status()).await;
    mark_all_healthy(&lb.pool).await;

    let client = reqwest::Client::new();
    for _ in 0..2 {
        let resp = client.get(lb.url("/ok")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    lb.pool.publish(&[]).await;
    let resp = client.get(lb.url("/ok")).send().await.unwrap();
    assert_eq!(resp.status(), 502);

    let status: StatusResponse = client
        .get(lb.url(STATUS_PATH))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status.stats.requests_forwarded, 2);
    assert_eq!(status.stats.requests_failed, 1);
    assert_eq!(status.pool.selections, 2);

    lb.stop().await;
}

#[tokio::test]
async fn status_path_is_forwarded_when_not_enabled() {
    let a = spawn_backend("a").await;
    let lb = spawn_balancer(&[a.url()], BalancerOptions::default()).await;
    mark_all_healthy(&lb.pool).await;

    let resp = reqwest::get(lb.url(STATUS_PATH)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(backend_tag(&resp), "a");
    assert_eq!(a.seen()[0].uri.path(), STATUS_PATH);

    lb.stop().await;
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let a = spawn_backend("a").await;
    let lb = spawn_balancer(&[a.url()], BalancerOptions::default()).await;
    mark_all_healthy(&lb.pool).await;

    let url = lb.url("/");
    assert!(reqwest::get(&url).await.is_ok());

    lb.stop().await;

    // Server should no longer accept connections
    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
