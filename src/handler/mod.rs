//! HTTP handlers: the interception points for track selection plus the
//! passthrough proxy for everything else.

pub mod fallback;
pub mod playbackinfo;
pub mod sessions;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::Response;
use bytes::Bytes;

use crate::server::AppState;

/// Headers carrying client credentials, forwarded to upstream requests the
/// proxy makes on its own behalf.
const AUTH_HEADERS: [&str; 4] = [
    "authorization",
    "x-emby-authorization",
    "x-emby-token",
    "x-mediabrowser-token",
];

/// One audio track decision, recorded per play session and media source.
#[derive(Debug, Clone)]
pub struct TrackDecision {
    /// Media source the decision was made for.
    pub media_source_id: String,
    /// Chosen audio stream index.
    pub index: i32,
}

/// Key for the decision map.
pub fn decision_key(play_session_id: &str, media_source_id: &str) -> String {
    format!("{}:{}", play_session_id, media_source_id)
}

/// Forward an intercepted request upstream with its body buffered.
pub(crate) async fn forward_upstream(
    state: &AppState,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<reqwest::Response, StatusCode> {
    let path_query = uri.path_and_query().map(|v| v.as_str()).unwrap_or(uri.path());

    let mut proxy_req = state.client.request(method, path_query);
    for (name, value) in headers {
        if name != reqwest::header::HOST
            && name != reqwest::header::CONTENT_LENGTH
            && name != reqwest::header::ACCEPT_ENCODING
        {
            proxy_req = proxy_req.header(name, value);
        }
    }
    proxy_req = proxy_req.header(reqwest::header::CONTENT_LENGTH, body.len().to_string());

    proxy_req.body(body).send().await.map_err(|e| {
        tracing::error!("Proxy error for {}: {}", path_query, e);
        StatusCode::BAD_GATEWAY
    })
}

/// Turn an upstream response into a streamed client response, stripping
/// hop-by-hop headers.
pub(crate) fn stream_response(res: reqwest::Response) -> Result<Response, StatusCode> {
    let mut response_builder = Response::builder().status(res.status());
    if let Some(headers) = response_builder.headers_mut() {
        for (name, value) in res.headers() {
            if name != reqwest::header::TRANSFER_ENCODING && name != reqwest::header::CONNECTION {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
    response_builder
        .body(Body::from_stream(res.bytes_stream()))
        .map_err(|e| {
            tracing::error!("Response building error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Auth headers of the original request, for proxy-initiated calls.
pub(crate) fn auth_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in AUTH_HEADERS {
        if let Some(value) = headers.get(name) {
            out.insert(HeaderName::from_static(name), value.clone());
        }
    }
    out
}

/// The MediaBrowser authorization header value, wherever the client put it.
pub(crate) fn auth_header_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-emby-authorization")
        .or_else(|| headers.get("authorization"))
        .and_then(|value| value.to_str().ok())
}
