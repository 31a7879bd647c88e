//! Core HTTP request forwarding handler.
//!
//! The [`forward_handler`] function is the Axum fallback that receives
//! every proxied request and walks it through the pipeline:
//!
//! ```text
//! Received -> BodyBuffered -> BackendSelected -> Forwarded -> ResponseRelayed
//!                 |                 |               |              |
//!                500/413           502             502            500
//! ```
//!
//! Each step ends the request with an error status on failure. A failed
//! forward is never retried against another backend. Header handling lives
//! in [`headers`], the upstream round trip in [`forward`].

pub mod forward;
pub mod headers;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;

use crate::error::ForwardError;
use crate::server::AppState;

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let (parts, body) = request.into_parts();

    tracing::info!(
        request_id = %request_id,
        remote = %addr,
        method = %parts.method,
        uri = %parts.uri,
        "request received"
    );

    let body = match buffer_body(body).await {
        Ok(bytes) => bytes,
        Err(status) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            return error_response(status);
        }
    };

    let Some(backend) = state.pool.pick().await else {
        tracing::warn!(
            request_id = %request_id,
            method = %parts.method,
            uri = %parts.uri,
            "no healthy backend"
        );
        return fail(&state, &ForwardError::NoBackend);
    };

    let outcome = match forward::build_request(
        &backend,
        &parts.method,
        &parts.uri,
        &parts.headers,
        body,
    ) {
        Ok(outbound) => forward::send(&state.http_client, outbound).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(relayed) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                request_id = %request_id,
                backend = %backend,
                status = relayed.status.as_u16(),
                bytes = relayed.body.len(),
                latency_ms = relayed.latency_ms,
                "response relayed"
            );

            let mut headers = relayed.headers;
            headers::strip_response_framing(&mut headers, &parts.method);

            let mut response = Response::new(Body::from(relayed.body));
            *response.status_mut() = relayed.status;
            *response.headers_mut() = headers;
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                backend = %backend,
                error = %e,
                "forward failed"
            );
            fail(&state, &e)
        }
    }
}

/// Read the whole inbound body. Fails with 413 when the body limit was hit
/// and 500 for any other read error.
async fn buffer_body(body: Body) -> Result<Bytes, StatusCode> {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            if is_length_limit(&e) {
                tracing::warn!(error = %e, "request body too large");
                Err(StatusCode::PAYLOAD_TOO_LARGE)
            } else {
                tracing::error!(error = %e, "failed to read request body");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn fail(state: &AppState, err: &ForwardError) -> Response {
    state.stats.failed.fetch_add(1, Ordering::Relaxed);
    error_response(err.status())
}

fn error_response(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or("Error")).into_response()
}
