//! Track selection: filter candidates through the capability matcher, rank
//! the survivors, and fall back to a broadly playable guess when nothing
//! passes the gates.

use std::cmp::Ordering;

use tracing::debug;

use super::capability::can_play;
use super::scoring::track_score;
use super::{AudioTrack, DeviceProfile};

/// Fallback search order when no track passes the compatibility gates:
/// stereo AAC, stereo AC-3, then any AAC, then any AC-3.
const FALLBACK_PRIORITIES: &[(&str, Option<u32>)] = &[
    ("aac", Some(2)),
    ("ac3", Some(2)),
    ("aac", None),
    ("ac3", None),
];

/// Choose the audio track a device should play.
///
/// Returns the winning track's index, or `None` when no decision can be
/// made - callers must then leave the existing default track unchanged.
pub fn select(
    tracks: &[AudioTrack],
    profile: Option<&DeviceProfile>,
    preferred_language: &str,
) -> Option<i32> {
    if tracks.is_empty() {
        return None;
    }
    // A single track needs no scoring.
    if tracks.len() == 1 {
        return Some(tracks[0].index);
    }

    let admissible: Vec<&AudioTrack> = tracks.iter().filter(|t| can_play(t, profile)).collect();
    if admissible.is_empty() {
        debug!("no track passed the compatibility gates, running fallback search");
        return find_fallback(tracks);
    }

    let mut ranked: Vec<(f64, &AudioTrack)> = admissible
        .into_iter()
        .map(|track| (track_score(track, profile, preferred_language), track))
        .collect();
    // Stable sort: among equal scores the first-encountered track wins.
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let (score, winner) = ranked.first()?;
    debug!(
        "selected audio track {} ({}) with score {:.2}",
        winner.index, winner.codec, score
    );
    Some(winner.index)
}

/// Search the original, unfiltered track list for a broadly playable track.
fn find_fallback(tracks: &[AudioTrack]) -> Option<i32> {
    for (codec, channels) in FALLBACK_PRIORITIES {
        let found = tracks.iter().find(|track| {
            track.codec.trim().eq_ignore_ascii_case(codec)
                && channels.is_none_or(|wanted| track.channels == Some(wanted))
        });
        if let Some(track) = found {
            return Some(track.index);
        }
    }
    None
}
