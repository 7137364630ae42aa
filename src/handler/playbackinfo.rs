//! PlaybackInfo interception: pick the default audio stream for each media
//! source before the response reaches the client.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header::HeaderMap, method::Method, uri::Uri, StatusCode},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::handler::{auth_header_value, decision_key, forward_upstream, TrackDecision};
use crate::jellyfin::convert;
use crate::jellyfin::types::{MediaSourceInfo, PlaybackInfoRequest};
use crate::selector;
use crate::server::AppState;

/// Decision maps are per play session; anything beyond this is leaked
/// sessions from clients that never started playback.
const MAX_TRACKED_DECISIONS: usize = 4096;

pub async fn playback_info_handler(
    State(state): State<Arc<AppState>>,
    Path(_item_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, StatusCode> {
    // Client capabilities ride along in the request body.
    let device_profile = extract_device_profile(&body, &headers);

    let res = forward_upstream(&state, method, &uri, &headers, body).await?;

    let status = res.status();
    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    let mut response_builder = Response::builder().status(status);
    if let Some(resp_headers) = response_builder.headers_mut() {
        for (name, value) in res.headers() {
            if name != reqwest::header::CONTENT_LENGTH
                && name != reqwest::header::CONTENT_ENCODING
                && name != reqwest::header::TRANSFER_ENCODING
                && name != reqwest::header::CONNECTION
            {
                resp_headers.insert(name.clone(), value.clone());
            }
        }
    }

    if state.config.selection_enabled() && is_json && status.is_success() {
        let body_bytes = res.bytes().await.map_err(|e| {
            tracing::error!("Failed to read PlaybackInfo upstream body: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        let modified_body = match serde_json::from_slice::<Value>(&body_bytes) {
            Ok(mut json) => {
                let decisions = apply_track_selection(
                    &mut json,
                    device_profile.as_ref(),
                    &state.config.preferred_language,
                );
                if state.decisions.len() > MAX_TRACKED_DECISIONS {
                    state.decisions.clear();
                }
                for (key, decision) in decisions {
                    state.decisions.insert(key, decision);
                }
                serde_json::to_vec(&json).map_err(|e| {
                    tracing::error!("Failed to re-encode PlaybackInfo response: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                })?
            }
            Err(e) => {
                warn!("Failed to decode PlaybackInfo response: {}, passing through", e);
                body_bytes.to_vec()
            }
        };

        if let Some(resp_headers) = response_builder.headers_mut() {
            resp_headers.insert(
                axum::http::header::CONTENT_LENGTH,
                axum::http::HeaderValue::from(modified_body.len()),
            );
        }

        return response_builder.body(Body::from(modified_body)).map_err(|e| {
            tracing::error!("Response building error in PlaybackInfo branch: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        });
    }

    let content_len = res.headers().get(reqwest::header::CONTENT_LENGTH).cloned();
    if let Some(len) = content_len {
        if let Some(resp_headers) = response_builder.headers_mut() {
            resp_headers.insert(reqwest::header::CONTENT_LENGTH, len);
        }
    }

    let body = Body::from_stream(res.bytes_stream());
    response_builder.body(body).map_err(|e| {
        tracing::error!("Response building error in PlaybackInfo fallback: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Build the core device profile from the request body, falling back to the
/// auth header's client name when the profile is anonymous.
fn extract_device_profile(body: &[u8], headers: &HeaderMap) -> Option<selector::DeviceProfile> {
    let request: PlaybackInfoRequest = serde_json::from_slice(body).ok()?;
    let wire = request.device_profile?;
    let fallback_name = auth_header_value(headers).and_then(|header| {
        convert::auth_field(header, "Client").or_else(|| convert::auth_field(header, "Device"))
    });
    Some(convert::device_profile(&wire, fallback_name.as_deref()))
}

/// Run track selection over every media source in a PlaybackInfo response
/// and rewrite its `DefaultAudioStreamIndex`.
///
/// Sources where no decision can be made keep whatever default the server
/// sent. Returns the decisions to record for later playback reports.
fn apply_track_selection(
    json: &mut Value,
    profile: Option<&selector::DeviceProfile>,
    preferred_language: &str,
) -> Vec<(String, TrackDecision)> {
    let mut decisions = Vec::new();

    let play_session_id = json
        .get("PlaySessionId")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let Some(sources) = json.get_mut("MediaSources").and_then(|v| v.as_array_mut()) else {
        return decisions;
    };

    for source in sources {
        let Ok(info) = serde_json::from_value::<MediaSourceInfo>(source.clone()) else {
            continue;
        };
        let tracks = convert::audio_tracks(&info.media_streams);
        let Some(index) = selector::select(&tracks, profile, preferred_language) else {
            continue;
        };

        source["DefaultAudioStreamIndex"] = Value::from(index);

        let media_source_id = info.id.unwrap_or_default();
        info!(
            "Selected audio stream {} for media source {} ({} candidates)",
            index,
            media_source_id,
            tracks.len()
        );
        decisions.push((
            decision_key(&play_session_id, &media_source_id),
            TrackDecision { media_source_id, index },
        ));
    }

    decisions
}
