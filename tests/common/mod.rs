//! Shared helpers for integration tests: throwaway backends and a balancer
//! bound to ephemeral ports on 127.0.0.1.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use rotor::pool::{Registry, ServerPool};
use rotor::server::{self, AppState};

/// What a test backend received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

struct BackendState {
    name: &'static str,
    status: AtomicU16,
    seen: Mutex<Vec<Recorded>>,
}

/// A backend that echoes the request body, tags its answers with an
/// `x-backend` header, and answers with a status that tests can change.
pub struct TestBackend {
    pub addr: SocketAddr,
    state: Arc<BackendState>,
}

impl TestBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    pub fn seen(&self) -> Vec<Recorded> {
        self.state.seen.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.seen.lock().unwrap().push(Recorded {
        method,
        uri,
        headers,
        body: body.clone(),
    });

    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap();
    (status, [("x-backend", state.name)], body).into_response()
}

pub async fn spawn_backend(name: &'static str) -> TestBackend {
    let state = Arc::new(BackendState {
        name,
        status: AtomicU16::new(200),
        seen: Mutex::new(Vec::new()),
    });
    let router = Router::new()
        .fallback(record)
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestBackend { addr, state }
}

/// A backend that answers every connection with the raw `response` bytes
/// and then closes it, whatever the response claims about its length.
pub async fn spawn_raw_backend(response: &'static [u8]) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket.write_all(response).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

/// URL of a port that was just released, so connecting to it fails.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub struct Balancer {
    pub addr: SocketAddr,
    pub pool: Arc<ServerPool>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Balancer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Stop accepting connections and wait for the server task to end.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap();
    }
}

pub struct BalancerOptions<'a> {
    pub status_path: Option<&'a str>,
    pub max_body: usize,
}

impl Default for BalancerOptions<'_> {
    fn default() -> Self {
        Self {
            status_path: None,
            max_body: 1024 * 1024,
        }
    }
}

/// Start a balancer over `backends`. The pool starts empty; tests publish
/// the healthy set themselves or run probe cycles.
pub async fn spawn_balancer(backends: &[String], options: BalancerOptions<'_>) -> Balancer {
    let pool = Arc::new(ServerPool::new(Registry::new(backends).unwrap()));
    let state = Arc::new(AppState::new(
        Arc::clone(&pool),
        server::build_http_client(),
    ));
    let router = server::build_router(state, options.max_body, options.status_path);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    Balancer {
        addr,
        pool,
        shutdown,
        handle,
    }
}

/// Publish every registered backend as healthy.
pub async fn mark_all_healthy(pool: &ServerPool) {
    let all = pool.registry().backends().to_vec();
    pool.publish(&all).await;
}

pub fn backend_tag(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("x-backend")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}
