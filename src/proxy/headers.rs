//! Header handling for forwarded requests and relayed responses.
//!
//! Request headers are copied verbatim apart from the ones the outbound
//! connection owns: `Host` is derived from the backend URL, and
//! `Content-Length` / `Transfer-Encoding` describe framing of a body that
//! has already been buffered. Hop-by-hop headers such as `Connection` are
//! not filtered.

use axum::http::header::{CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use axum::http::{HeaderMap, HeaderName, Method};

const TRANSPORT_OWNED: [HeaderName; 3] = [HOST, CONTENT_LENGTH, TRANSFER_ENCODING];
const FRAMING: [HeaderName; 2] = [CONTENT_LENGTH, TRANSFER_ENCODING];

/// Headers to send upstream for an inbound request.
#[must_use]
pub fn outbound_request_headers(original: &HeaderMap) -> HeaderMap {
    let mut headers = original.clone();
    for name in &TRANSPORT_OWNED {
        headers.remove(name);
    }
    headers
}

/// Remove framing headers from an upstream response whose body has been
/// collected; the server recomputes them for the buffered body.
///
/// A response to `HEAD` has no body to measure, so its `Content-Length`
/// still describes the resource and is kept.
pub fn strip_response_framing(headers: &mut HeaderMap, method: &Method) {
    if *method == Method::HEAD {
        headers.remove(TRANSFER_ENCODING);
        return;
    }
    for name in &FRAMING {
        headers.remove(name);
    }
}
