//! Optional status endpoint served by the balancer itself.
//!
//! Returns a [`StatusResponse`] JSON payload with the server version,
//! uptime, per-backend health as of the latest probe cycle, selection and
//! request counters. Mounted only when `--status-path` is set.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub pool: PoolStatus,
    pub stats: StatsResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PoolStatus {
    pub registered: usize,
    pub healthy: usize,
    pub backends: Vec<BackendStatus>,
    pub probe_cycles: u64,
    pub last_cycle_ago_seconds: Option<u64>,
    pub selections: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendStatus {
    pub url: String,
    pub healthy: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
}

/// `ok` when every backend is healthy, `unavailable` when none is.
#[must_use]
pub const fn summarize(healthy: usize, registered: usize) -> &'static str {
    if healthy == 0 {
        "unavailable"
    } else if healthy < registered {
        "degraded"
    } else {
        "ok"
    }
}

pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.pool.snapshot().await;
    let registry = state.pool.registry();

    let backends: Vec<BackendStatus> = registry
        .backends()
        .iter()
        .map(|b| BackendStatus {
            url: b.to_string(),
            healthy: snapshot.contains(b),
        })
        .collect();

    Json(StatusResponse {
        status: summarize(snapshot.backends.len(), registry.len()).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        pool: PoolStatus {
            registered: registry.len(),
            healthy: snapshot.backends.len(),
            backends,
            probe_cycles: snapshot.generation,
            last_cycle_ago_seconds: snapshot.published_at.map(|t| t.elapsed().as_secs()),
            selections: state.pool.selections() as u64,
        },
        stats: StatsResponse {
            requests_forwarded: state.stats.forwarded.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
