//! Playback-start interception: when a client starts playing with a
//! different audio stream than was selected for its play session, send a
//! SetAudioStreamIndex command to steer it back.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::HeaderMap, method::Method, uri::Uri, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::handler::{
    auth_header_value, auth_headers, decision_key, forward_upstream, stream_response,
    TrackDecision,
};
use crate::jellyfin::convert;
use crate::jellyfin::types::PlaybackStartInfo;
use crate::server::AppState;

pub async fn playback_start_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let report: Option<PlaybackStartInfo> = serde_json::from_slice(&body).ok();

    let res = forward_upstream(&state, method, &uri, &headers, body).await?;

    if state.config.selection_enabled() && res.status().is_success() {
        if let Some(report) = report {
            correct_audio_stream(&state, &headers, report);
        }
    }

    stream_response(res)
}

/// Compare the reported audio stream against the recorded decision and, on
/// a mismatch, send the track switch in the background. Every failure path
/// degrades to doing nothing - playback continues on the client's choice.
fn correct_audio_stream(state: &Arc<AppState>, headers: &HeaderMap, report: PlaybackStartInfo) {
    let (Some(play_session_id), Some(media_source_id)) =
        (report.play_session_id.clone(), report.media_source_id.clone())
    else {
        return;
    };

    let key = decision_key(&play_session_id, &media_source_id);
    // A decision is one-shot: consuming it here keeps the map bounded by
    // the number of in-flight play sessions.
    let Some((_, decision)) = state.decisions.remove(&key) else {
        return;
    };
    if !needs_correction(&report, &decision) {
        return;
    }

    let Some(device_id) =
        auth_header_value(headers).and_then(|header| convert::auth_field(header, "DeviceId"))
    else {
        warn!(
            "Playback report for session {} has no device id, cannot switch track",
            play_session_id
        );
        return;
    };

    let auth = auth_headers(headers);
    let client = state.client.clone();
    let reported = report.audio_stream_index;

    tokio::spawn(async move {
        info!(
            "Correcting audio stream for play session {} (client picked {:?}, selected {})",
            play_session_id, reported, decision.index
        );
        match client.find_session_id(&device_id, &auth).await {
            Ok(Some(session_id)) => {
                if let Err(e) = client
                    .set_audio_stream_index(&session_id, decision.index, &auth)
                    .await
                {
                    warn!("Failed to switch audio stream on session {}: {}", session_id, e);
                }
            }
            Ok(None) => warn!("No session found for device {}", device_id),
            Err(e) => warn!("Session lookup failed for device {}: {}", device_id, e),
        }
    });
}

fn needs_correction(report: &PlaybackStartInfo, decision: &TrackDecision) -> bool {
    report.audio_stream_index != Some(decision.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use clap::Parser;

    fn decision(index: i32) -> TrackDecision {
        TrackDecision {
            media_source_id: "source-1".to_string(),
            index,
        }
    }

    fn report(index: Option<i32>) -> PlaybackStartInfo {
        PlaybackStartInfo {
            item_id: Some("item-1".to_string()),
            media_source_id: Some("source-1".to_string()),
            play_session_id: Some("psid-1".to_string()),
            audio_stream_index: index,
        }
    }

    #[test]
    fn test_matching_index_needs_no_correction() {
        assert!(!needs_correction(&report(Some(2)), &decision(2)));
    }

    #[test]
    fn test_mismatch_needs_correction() {
        assert!(needs_correction(&report(Some(1)), &decision(2)));
        // A report without an index is also a mismatch.
        assert!(needs_correction(&report(None), &decision(2)));
    }

    #[test]
    fn test_decision_consumed_on_playback_start() {
        let config = Config::parse_from(["jellyfin-audio-proxy"]);
        let state = Arc::new(AppState::new(config).unwrap());
        state
            .decisions
            .insert(decision_key("psid-1", "source-1"), decision(2));
        state
            .decisions
            .insert(decision_key("psid-2", "source-1"), decision(3));

        // The client already picked the selected track, so no command goes
        // out, but the decision for this session is still consumed.
        correct_audio_stream(&state, &HeaderMap::new(), report(Some(2)));

        assert!(!state.decisions.contains_key(&decision_key("psid-1", "source-1")));
        assert!(state.decisions.contains_key(&decision_key("psid-2", "source-1")));

        // A second report for the same session finds nothing to do.
        correct_audio_stream(&state, &HeaderMap::new(), report(Some(2)));
        assert_eq!(state.decisions.len(), 1);
    }
}
