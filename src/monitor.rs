//! Active health checking.
//!
//! The [`HealthMonitor`] runs one probe cycle per tick: every registered
//! backend is probed in its own task, the cycle waits for all of them, and
//! the healthy subset is published to the [`ServerPool`] in a single swap.
//! Each probe task returns its own outcome; nothing is shared between tasks
//! while they run.
//!
//! Probing goes through the [`Prober`] trait. [`HttpProber`] issues a plain
//! `GET` against the backend base URL and treats any 2xx answer received
//! within the timeout as healthy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use http_body_util::Full;
use hyper::StatusCode;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::pool::{Backend, PoolSnapshot, ServerPool};
use crate::server::HttpClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy(StatusCode),
    BadStatus(StatusCode),
    Transport(String),
    TimedOut,
}

impl ProbeOutcome {
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy(_))
    }
}

// async_trait keeps Prober object-safe; the monitor holds an Arc<dyn Prober>
// and moves clones of it into spawned probe tasks.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, backend: &Backend) -> ProbeOutcome;
}

pub struct HttpProber {
    client: HttpClient,
    timeout: Duration,
}

impl HttpProber {
    #[must_use]
    pub const fn new(client: HttpClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, backend: &Backend) -> ProbeOutcome {
        let request = match hyper::Request::builder()
            .method(hyper::Method::GET)
            .uri(backend.as_str())
            .header(hyper::header::USER_AGENT, "rotor-health-check")
            .body(Full::new(Bytes::new()))
        {
            Ok(r) => r,
            Err(e) => return ProbeOutcome::Transport(e.to_string()),
        };

        match tokio::time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) if response.status().is_success() => {
                ProbeOutcome::Healthy(response.status())
            }
            Ok(Ok(response)) => ProbeOutcome::BadStatus(response.status()),
            Ok(Err(e)) => ProbeOutcome::Transport(e.to_string()),
            Err(_) => ProbeOutcome::TimedOut,
        }
    }
}

pub struct HealthMonitor {
    pool: Arc<ServerPool>,
    prober: Arc<dyn Prober>,
    interval: Duration,
}

impl HealthMonitor {
    #[must_use]
    pub fn new(pool: Arc<ServerPool>, prober: Arc<dyn Prober>, interval: Duration) -> Self {
        Self {
            pool,
            prober,
            interval,
        }
    }

    /// Probe on every tick until `shutdown` flips or its sender is dropped.
    ///
    /// The first cycle runs immediately. A slow cycle delays the next tick
    /// rather than causing a burst of catch-up cycles.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            backends = self.pool.registry().len(),
            "health monitor starting"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = shutdown.changed() => {
                    tracing::debug!("health monitor shutting down");
                    return;
                }
            }
        }
    }

    /// Probe every registered backend once and publish the healthy subset.
    pub async fn run_cycle(&self) -> Arc<PoolSnapshot> {
        let started = Instant::now();
        let previous = self.pool.snapshot().await;

        let handles: Vec<_> = self
            .pool
            .registry()
            .backends()
            .iter()
            .cloned()
            .map(|backend| {
                let prober = Arc::clone(&self.prober);
                tokio::spawn(async move {
                    let outcome = prober.probe(&backend).await;
                    (backend, outcome)
                })
            })
            .collect();

        let mut healthy = Vec::with_capacity(handles.len());
        for (result, backend) in join_all(handles)
            .await
            .into_iter()
            .zip(self.pool.registry().backends())
        {
            match result {
                Ok((backend, outcome)) => {
                    log_outcome(&backend, &outcome, previous.contains(&backend));
                    if outcome.is_healthy() {
                        healthy.push(backend);
                    }
                }
                Err(join_err) => {
                    tracing::error!(
                        backend = %backend,
                        error = %join_err,
                        "probe task failed"
                    );
                }
            }
        }

        let snapshot = self.pool.publish(&healthy).await;

        tracing::debug!(
            generation = snapshot.generation,
            healthy = snapshot.backends.len(),
            registered = self.pool.registry().len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "probe cycle complete"
        );
        if snapshot.backends.is_empty() {
            tracing::warn!(
                generation = snapshot.generation,
                "no healthy backends, requests will be rejected"
            );
        }

        snapshot
    }
}

fn log_outcome(backend: &Backend, outcome: &ProbeOutcome, was_healthy: bool) {
    match outcome {
        ProbeOutcome::Healthy(status) => {
            if !was_healthy {
                tracing::info!(backend = %backend, status = %status, "backend is healthy");
            }
        }
        ProbeOutcome::BadStatus(status) => {
            tracing::warn!(
                backend = %backend,
                status = %status,
                was_healthy,
                "health check failed: non-success status"
            );
        }
        ProbeOutcome::Transport(error) => {
            tracing::warn!(
                backend = %backend,
                error = %error,
                was_healthy,
                "health check failed: connection error"
            );
        }
        ProbeOutcome::TimedOut => {
            tracing::warn!(backend = %backend, was_healthy, "health check failed: timeout");
        }
    }
}
