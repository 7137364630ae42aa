//! Capability matching: can this device decode this track, and how many
//! channels can it drive.

use super::{AudioTrack, DeviceProfile, SpatialFormat};

/// Codecs assumed decodable by any client when no profile is registered.
pub const UNIVERSAL_CODECS: &[&str] = &["aac", "ac3", "mp3", "eac3", "vorbis"];

/// Channel ceiling when a profile carries no audio channel constraints.
const DEFAULT_MAX_CHANNELS: u32 = 8;

/// Channel ceiling when no profile is registered at all.
const NO_PROFILE_MAX_CHANNELS: u32 = 2;

/// Client families that cannot decode TrueHD; Atmos reaches them over the
/// E-AC-3 compatibility stream instead.
const APPLE_TV_FAMILY: &[&str] = &["apple tv", "appletv", "swiftfin", "tvos"];

/// Check whether a device can play a track without a new encode.
///
/// With no profile this is a membership test against [`UNIVERSAL_CODECS`].
/// With a profile, four gates must all pass: codec allow-list (with the
/// Apple TV TrueHD exclusion), channel ceiling, static bitrate ceilings,
/// and the spatial format gate.
pub fn can_play(track: &AudioTrack, profile: Option<&DeviceProfile>) -> bool {
    let codec = track.codec.trim().to_lowercase();
    if codec.is_empty() {
        return false;
    }

    let Some(profile) = profile else {
        return is_universal_codec(&codec);
    };

    // Codec gate
    if is_apple_tv_family(&profile.name) && codec.contains("truehd") {
        return false;
    }
    let allowed = profile
        .direct_play_codecs
        .iter()
        .chain(profile.transcoding_codecs.iter())
        .any(|c| c.trim().eq_ignore_ascii_case(&codec))
        || is_universal_codec(&codec);
    if !allowed {
        return false;
    }

    // Channel gate
    if let Some(channels) = track.channels {
        if channels > 0 && channels > max_channels(Some(profile)) {
            return false;
        }
    }

    // Bitrate gate
    if let Some(bit_rate) = track.bit_rate {
        if bit_rate > 0 {
            if let Some(limit) = profile.max_static_music_bitrate {
                if bit_rate > limit {
                    return false;
                }
            }
            if let Some(limit) = profile.max_static_bitrate {
                if bit_rate > limit {
                    return false;
                }
            }
        }
    }

    passes_spatial_gate(track, profile)
}

/// Effective channel ceiling for a device.
///
/// No profile means a conservative stereo ceiling. Otherwise the ceiling
/// starts at [`DEFAULT_MAX_CHANNELS`] and takes the minimum across every
/// audio-applying constraint. The result is clamped to at least one channel
/// so a zero limit in a profile can never poison channel scoring.
pub fn max_channels(profile: Option<&DeviceProfile>) -> u32 {
    let Some(profile) = profile else {
        return NO_PROFILE_MAX_CHANNELS;
    };
    let mut ceiling = DEFAULT_MAX_CHANNELS;
    for limit in &profile.channel_limits {
        if limit.applies_to_audio {
            ceiling = ceiling.min(limit.max_channels);
        }
    }
    ceiling.max(1)
}

/// Spatial formats are admitted for every device today. The Apple TV
/// family keeps an explicit Atmos accept path (delivered as DD+ metadata)
/// so a future per-device restriction has somewhere to hang.
fn passes_spatial_gate(track: &AudioTrack, profile: &DeviceProfile) -> bool {
    match track.spatial_format {
        SpatialFormat::None => true,
        SpatialFormat::DolbyAtmos if is_apple_tv_family(&profile.name) => true,
        _ => true,
    }
}

fn is_universal_codec(codec: &str) -> bool {
    UNIVERSAL_CODECS.iter().any(|c| codec.eq_ignore_ascii_case(c))
}

fn is_apple_tv_family(name: &str) -> bool {
    let name = name.to_lowercase();
    APPLE_TV_FAMILY.iter().any(|family| name.contains(family))
}
