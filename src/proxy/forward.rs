//! Re-issue a buffered request against one backend and collect its answer.
//!
//! The upstream body is collected in full before anything is handed back,
//! so a body read failure never leaves the caller with a half-written
//! response.

use std::time::Instant;

use axum::http::{HeaderMap, Method, StatusCode, Uri};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use super::headers::outbound_request_headers;
use crate::error::ForwardError;
use crate::pool::Backend;
use crate::server::HttpClient;

#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub latency_ms: u64,
}

/// Build the outbound request: same method, headers, and body, aimed at
/// `backend` + the original path and query.
pub fn build_request(
    backend: &Backend,
    method: &Method,
    uri: &Uri,
    original_headers: &HeaderMap,
    body: Bytes,
) -> Result<hyper::Request<Full<Bytes>>, ForwardError> {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let url = backend.join(path_and_query);

    let mut request = hyper::Request::builder()
        .method(method.clone())
        .uri(url.as_str())
        .body(Full::new(body))
        .map_err(|source| ForwardError::UpstreamUri { uri: url, source })?;
    *request.headers_mut() = outbound_request_headers(original_headers);

    Ok(request)
}

/// Send `request` and collect the full response. No retries.
pub async fn send(
    client: &HttpClient,
    request: hyper::Request<Full<Bytes>>,
) -> Result<Relayed, ForwardError> {
    let start = Instant::now();

    let response = client.request(request).await?;
    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(ForwardError::ResponseBody)?
        .to_bytes();

    Ok(Relayed {
        status: parts.status,
        headers: parts.headers,
        body,
        latency_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> Backend {
        Backend::parse("http://10.1.0.5:8080").unwrap()
    }

    #[test]
    fn targets_backend_with_original_path_and_query() {
        let uri: Uri = "/search?q=rust&page=2".parse().unwrap();
        let request = build_request(
            &backend(),
            &Method::POST,
            &uri,
            &HeaderMap::new(),
            Bytes::from_static(b"payload"),
        )
        .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.uri().to_string(),
            "http://10.1.0.5:8080/search?q=rust&page=2"
        );
    }

    #[test]
    fn absolute_form_inbound_uri_keeps_only_path() {
        let uri: Uri = "http://lb.example.com/a/b".parse().unwrap();
        let request =
            build_request(&backend(), &Method::GET, &uri, &HeaderMap::new(), Bytes::new())
                .unwrap();
        assert_eq!(request.uri().to_string(), "http://10.1.0.5:8080/a/b");
    }

    #[test]
    fn copies_headers_except_host() {
        let mut headers = HeaderMap::new();
        headers.insert("host", "lb.example.com".parse().unwrap());
        headers.insert("x-api-key", "secret".parse().unwrap());

        let uri: Uri = "/".parse().unwrap();
        let request =
            build_request(&backend(), &Method::GET, &uri, &headers, Bytes::new()).unwrap();

        assert!(request.headers().get("host").is_none());
        assert_eq!(request.headers().get("x-api-key").unwrap(), "secret");
    }
}
