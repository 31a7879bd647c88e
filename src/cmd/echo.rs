//! `rotor echo`: a demonstration backend.
//!
//! Answers every request on every path with `200 OK` and a fixed message,
//! logging who asked and what for. Useful for trying the balancer locally:
//! start a few of these on different ports and point `rotor run` at them.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::USER_AGENT;
use axum::Router;

use crate::cli::EchoArgs;
use crate::error::RotorError;
use crate::logging;
use crate::server;

pub async fn execute(args: EchoArgs) -> Result<(), RotorError> {
    logging::init(&args.log_level, logging::resolve_format(false, false));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "echo backend started");

    axum::serve(
        listener,
        router(args.message).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("echo backend stopped");
    Ok(())
}

/// Router that answers every request with `message` followed by a newline.
pub fn router(message: String) -> Router {
    Router::new()
        .fallback(echo_handler)
        .with_state(Arc::<str>::from(format!("{message}\n")))
}

async fn echo_handler(
    State(message): State<Arc<str>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request,
) -> String {
    let headers = request.headers();
    tracing::info!(
        remote = %remote,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        host = headers.get("host").and_then(|v| v.to_str().ok()).unwrap_or(""),
        user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok()).unwrap_or(""),
        "request received"
    );
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn serve(message: &str) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(message.to_string()).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn answers_every_path_with_the_message() {
        let addr = serve("Hello From Backend Server").await;
        let client = reqwest::Client::new();

        let resp = client.get(format!("http://{addr}/")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "Hello From Backend Server\n");

        let resp = client
            .post(format!("http://{addr}/any/path?x=1"))
            .body("ignored")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "Hello From Backend Server\n");
    }
}
