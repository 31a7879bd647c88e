//! `rotor run`: start the load balancer.
//!
//! Resolves the startup configuration, builds the server pool, spawns the
//! health monitor, and serves until SIGTERM / Ctrl+C. The monitor is told
//! to stop once the listener has drained.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::config::{self, Overrides};
use crate::error::{RotorError, ValidationError};
use crate::logging;
use crate::monitor::{HealthMonitor, HttpProber};
use crate::pool::{Registry, ServerPool};
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), RotorError> {
    logging::init(&args.log_level, logging::resolve_format(args.pretty, args.json));

    if let Some(ref path) = args.status_path {
        check_status_path(path)?;
    }

    let overrides = Overrides {
        backends: args.backends,
        interval: args.interval,
        probe_timeout: args.probe_timeout,
    };
    let (config, origin) = config::resolve(args.config.as_deref(), overrides).await?;

    let registry = Registry::from_config(&config)?;
    let pool = Arc::new(ServerPool::new(registry));

    // Validation guarantees the interval is present and non-zero.
    let interval = Duration::from_secs(config.health_check.interval.unwrap_or(1));
    let probe_timeout = Duration::from_millis(config.health_check.timeout);

    let http_client = server::build_http_client();
    let prober = Arc::new(HttpProber::new(http_client.clone(), probe_timeout));
    let monitor = HealthMonitor::new(Arc::clone(&pool), prober, interval);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));

    let state = Arc::new(AppState::new(Arc::clone(&pool), http_client));
    let router = server::build_router(state, args.max_body, args.status_path.as_deref());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        backends = pool.registry().len(),
        interval_secs = interval.as_secs(),
        probe_timeout_ms = config.health_check.timeout,
        config = %origin,
        "rotor started"
    );

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown)
    .await?;

    if let Err(e) = monitor_handle.await {
        tracing::error!(error = %e, "health monitor task failed");
    }

    tracing::info!("rotor stopped");
    Ok(())
}

fn check_status_path(path: &str) -> Result<(), RotorError> {
    if path.starts_with('/') {
        return Ok(());
    }
    Err(RotorError::ConfigValidation {
        errors: vec![ValidationError {
            location: "--status-path".into(),
            field: "path".into(),
            message: format!("'{path}' must start with '/'"),
            suggestion: Some(format!("did you mean '/{path}'?")),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_path_must_be_absolute() {
        assert!(check_status_path("/__rotor/status").is_ok());

        let err = check_status_path("status").unwrap_err();
        assert!(err.to_string().contains("did you mean '/status'?"));
    }
}
