//! Passthrough proxy for every request we do not intercept.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::server::AppState;

/// Proxy an unmatched request to Jellyfin and stream the response back.
pub async fn fallback_proxy(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Response, StatusCode> {
    if is_websocket_upgrade(&req) {
        warn!("WebSocket upgrade requested on {}, not supported", req.uri().path());
        return Err(StatusCode::BAD_REQUEST);
    }

    let method = req.method().clone();
    let path_query = req
        .uri()
        .path_and_query()
        .map(|v| v.as_str())
        .unwrap_or(req.uri().path())
        .to_string();

    let mut proxy_req = state.client.request(method, &path_query);

    for (name, value) in req.headers() {
        if name != reqwest::header::HOST {
            proxy_req = proxy_req.header(name, value);
        }
    }

    let body_bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    proxy_req = proxy_req.body(body_bytes);

    let res = match proxy_req.send().await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!("Proxy error for {}: {}", path_query, e);
            return Err(StatusCode::BAD_GATEWAY);
        }
    };

    let mut response_builder = Response::builder().status(res.status());

    if let Some(headers) = response_builder.headers_mut() {
        for (name, value) in res.headers() {
            if name == reqwest::header::LOCATION {
                // Rewrite absolute upstream URLs to relative root URLs.
                if let Ok(loc_str) = value.to_str() {
                    if loc_str.starts_with(state.client.base_url()) {
                        let new_loc = loc_str.replace(state.client.base_url(), "");
                        let new_loc = if new_loc.is_empty() { "/".to_string() } else { new_loc };
                        if let Ok(new_val) = axum::http::HeaderValue::from_str(&new_loc) {
                            headers.insert(name.clone(), new_val);
                            continue;
                        }
                    }
                }
            }
            // Strip hop-by-hop headers
            if name != reqwest::header::TRANSFER_ENCODING && name != reqwest::header::CONNECTION {
                headers.insert(name.clone(), value.clone());
            }
        }
    }

    let body = Body::from_stream(res.bytes_stream());
    response_builder.body(body).map_err(|e| {
        tracing::error!("Response building error in proxy: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Check if a request is a WebSocket upgrade request.
fn is_websocket_upgrade(req: &Request) -> bool {
    req.headers()
        .get("upgrade")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}
