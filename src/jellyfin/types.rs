//! Jellyfin API types for playback information and session control.
//!
//! Only the fields we consult are modeled; response bodies are mutated as
//! raw JSON so everything else passes through untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Media stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaStreamType {
    Audio,
    Video,
    Subtitle,
    #[serde(other)]
    Other,
}

/// One stream within a media source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStream {
    /// Stream index within the media source.
    #[serde(default)]
    pub index: Option<i32>,
    /// Stream type.
    #[serde(default, rename = "Type")]
    pub stream_type: Option<MediaStreamType>,
    /// Codec name.
    #[serde(default)]
    pub codec: Option<String>,
    /// Codec profile string (e.g. "Dolby TrueHD + Dolby Atmos").
    #[serde(default)]
    pub profile: Option<String>,
    /// Spatial audio format reported by newer servers
    /// ("None", "DolbyAtmos", "DTSX").
    #[serde(default)]
    pub audio_spatial_format: Option<String>,
    /// Channel count.
    #[serde(default)]
    pub channels: Option<i32>,
    /// Bitrate in bits per second.
    #[serde(default)]
    pub bit_rate: Option<i64>,
    /// Language code.
    #[serde(default)]
    pub language: Option<String>,
    /// Display title.
    #[serde(default)]
    pub display_title: Option<String>,
    /// Raw title.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether this is the default stream.
    #[serde(default)]
    pub is_default: Option<bool>,
}

/// Direct play profile describing what the client decodes natively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectPlayProfile {
    /// Container formats (comma-separated).
    #[serde(default)]
    pub container: Option<String>,
    /// Media type ("Audio", "Video", "Photo").
    #[serde(default, rename = "Type")]
    pub profile_type: Option<String>,
    /// Video codecs (comma-separated).
    #[serde(default)]
    pub video_codec: Option<String>,
    /// Audio codecs (comma-separated).
    #[serde(default)]
    pub audio_codec: Option<String>,
}

/// Transcoding profile: formats the server may convert to for this client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranscodingProfile {
    /// Container for transcoded output.
    #[serde(default)]
    pub container: Option<String>,
    /// Media type.
    #[serde(default, rename = "Type")]
    pub profile_type: Option<String>,
    /// Audio codecs (comma-separated).
    #[serde(default)]
    pub audio_codec: Option<String>,
    /// Transcoding protocol.
    #[serde(default)]
    pub protocol: Option<String>,
}

/// One constraint within a codec profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileCondition {
    /// Comparison kind ("LessThanEqual", "Equals", ...).
    #[serde(default)]
    pub condition: Option<String>,
    /// Property the condition constrains ("AudioChannels", ...).
    #[serde(default)]
    pub property: Option<String>,
    /// Constraint value, as a string.
    #[serde(default)]
    pub value: Option<String>,
}

/// Conditional limits for a codec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodecProfile {
    /// Media type the profile applies to ("Audio", "VideoAudio", "Video").
    #[serde(default, rename = "Type")]
    pub profile_type: Option<String>,
    /// Codec names (comma-separated), empty meaning all.
    #[serde(default)]
    pub codec: Option<String>,
    /// Conditions that must hold for the codec to be playable.
    #[serde(default)]
    pub conditions: Vec<ProfileCondition>,
}

/// Device capabilities sent by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceProfile {
    /// Profile name.
    #[serde(default)]
    pub name: Option<String>,
    /// Direct play profiles.
    #[serde(default)]
    pub direct_play_profiles: Vec<DirectPlayProfile>,
    /// Transcoding profiles.
    #[serde(default)]
    pub transcoding_profiles: Vec<TranscodingProfile>,
    /// Codec profiles with conditional limits.
    #[serde(default)]
    pub codec_profiles: Vec<CodecProfile>,
    /// Overall static bitrate ceiling.
    #[serde(default)]
    pub max_static_bitrate: Option<i64>,
    /// Music-specific static bitrate ceiling.
    #[serde(default)]
    pub max_static_music_bitrate: Option<i64>,
}

/// Playback info request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackInfoRequest {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Device profile describing client capabilities.
    #[serde(default)]
    pub device_profile: Option<DeviceProfile>,
}

/// One playable rendition of an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaSourceInfo {
    /// Media source ID.
    #[serde(default)]
    pub id: Option<String>,
    /// All streams of the source.
    #[serde(default)]
    pub media_streams: Vec<MediaStream>,
    /// Index of the default audio stream.
    #[serde(default)]
    pub default_audio_stream_index: Option<i32>,
}

/// Playback info response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackInfoResponse {
    /// Media sources.
    #[serde(default)]
    pub media_sources: Vec<MediaSourceInfo>,
    /// Play session ID.
    #[serde(default)]
    pub play_session_id: Option<String>,
}

/// Playback start report posted by clients to `/Sessions/Playing`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackStartInfo {
    /// Item being played.
    #[serde(default)]
    pub item_id: Option<String>,
    /// Media source being played.
    #[serde(default)]
    pub media_source_id: Option<String>,
    /// Play session the report belongs to.
    #[serde(default)]
    pub play_session_id: Option<String>,
    /// Audio stream the client actually picked.
    #[serde(default)]
    pub audio_stream_index: Option<i32>,
}

/// Minimal session info, as returned by `/Sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionInfo {
    /// Session ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Device ID the session belongs to.
    #[serde(default)]
    pub device_id: Option<String>,
}

/// General command posted to `/Sessions/{id}/Command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneralCommand {
    /// Command name.
    pub name: String,
    /// Command arguments; Jellyfin expects string values.
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}
