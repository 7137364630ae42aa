//! Audio track selection core.
//!
//! Pure functions over plain data: given the candidate audio tracks of one
//! media source and a description of the client device's decoding
//! capabilities, pick the track index that best balances perceptual quality
//! against compatibility. No I/O, no shared state, deterministic for
//! identical inputs.

mod capability;
mod scoring;
mod selection;

pub use capability::{can_play, max_channels, UNIVERSAL_CODECS};
pub use scoring::{
    bitrate_score, channel_score, codec_score, language_score, spatial_score, track_score,
};
pub use selection::select;

/// Spatial (object-based) surround metadata layered on a base codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialFormat {
    #[default]
    None,
    DolbyAtmos,
    DtsX,
    Other,
}

/// One candidate audio track within a media source.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    /// Stream index, unique within the media source. This is the value
    /// returned to the caller on selection.
    pub index: i32,
    /// Codec identifier (e.g. "truehd", "eac3", "aac"), compared
    /// case-insensitively. May be empty when the codec is unknown.
    pub codec: String,
    /// Channel count; `None` or zero means unknown.
    pub channels: Option<u32>,
    /// Bitrate in bits per second; `None` or zero means unknown.
    pub bit_rate: Option<u64>,
    /// Spatial audio format, if any.
    pub spatial_format: SpatialFormat,
    /// ISO 639 language code, compared case-insensitively.
    pub language: Option<String>,
    /// Display label; never scored.
    pub title: Option<String>,
}

/// One channel-count constraint from a device profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLimit {
    /// Whether the constraint applies to audio streams.
    pub applies_to_audio: bool,
    /// Maximum channel count the constraint allows.
    pub max_channels: u32,
}

/// Decoding capabilities of one client device.
///
/// Callers pass `Option<&DeviceProfile>`: `None` is the distinct
/// "no profile registered" state, which falls back to the
/// [`UNIVERSAL_CODECS`] allow-list and a two-channel ceiling.
#[derive(Debug, Clone, Default)]
pub struct DeviceProfile {
    /// Profile name, used only to detect known client families.
    pub name: String,
    /// Codecs the device decodes natively (audio-only and combined
    /// audio+video profile entries both land here).
    pub direct_play_codecs: Vec<String>,
    /// Codecs reachable via server-side transcoding.
    pub transcoding_codecs: Vec<String>,
    /// Channel-count constraints; the effective ceiling is the minimum
    /// across all audio-applying entries.
    pub channel_limits: Vec<ChannelLimit>,
    /// Overall static bitrate ceiling in bits per second.
    pub max_static_bitrate: Option<u64>,
    /// Music-specific static bitrate ceiling in bits per second.
    pub max_static_music_bitrate: Option<u64>,
}
