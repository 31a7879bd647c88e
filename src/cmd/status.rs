//! `rotor status`: query the status endpoint of a running instance.
//!
//! Sends a `GET` to the given URL (the instance must have been started
//! with `--status-path`) and prints the pool state as text or raw JSON.

use std::time::Duration;

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::StatusArgs;
use crate::error::RotorError;
use crate::status::StatusResponse;

const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: StatusArgs) -> Result<(), RotorError> {
    let uri: hyper::Uri = args
        .url
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| RotorError::UriParse {
            source: Box::new(e),
        })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| RotorError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(QUERY_TIMEOUT, client.request(req))
        .await
        .map_err(|_| RotorError::HttpRequest {
            source: "status query timed out after 10s".into(),
        })?
        .map_err(|e| RotorError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| RotorError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(RotorError::StatusCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<StatusResponse>(&body) {
        Ok(report) => print_report(&args.url, &report),
        Err(e) => {
            eprintln!("Failed to parse status response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn print_report(url: &str, report: &StatusResponse) {
    let mark = if report.pool.healthy == 0 {
        '\u{2717}'
    } else {
        '\u{2713}'
    };
    println!("{mark} rotor v{} is {} ({url})", report.version, report.status);
    println!("  uptime:       {}", format_uptime(report.uptime_seconds));
    println!(
        "  pool:         {}/{} healthy, {} probe cycles",
        report.pool.healthy, report.pool.registered, report.pool.probe_cycles
    );
    if let Some(ago) = report.pool.last_cycle_ago_seconds {
        println!("  last cycle:   {ago}s ago");
    }
    for backend in &report.pool.backends {
        let state = if backend.healthy { "up" } else { "down" };
        println!("    {state:<4} {}", backend.url);
    }
    println!(
        "  requests:     {} forwarded, {} failed, {} selections",
        report.stats.requests_forwarded, report.stats.requests_failed, report.pool.selections
    );
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_uses_largest_unit() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }
}
