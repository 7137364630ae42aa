//! Mapping between Jellyfin wire types and the selection core's domain
//! types, plus auth header parsing.

use crate::jellyfin::types;
use crate::selector::{AudioTrack, ChannelLimit, DeviceProfile, SpatialFormat};

/// Build a core device profile from the wire profile a client sent.
///
/// `fallback_name` (typically the client name from the auth header) is used
/// when the wire profile carries no name of its own, so client-family
/// detection still works for clients that send anonymous profiles.
pub fn device_profile(
    wire: &types::DeviceProfile,
    fallback_name: Option<&str>,
) -> DeviceProfile {
    let mut direct_play_codecs = Vec::new();
    for profile in &wire.direct_play_profiles {
        // Audio-only and combined audio+video entries both count.
        if matches!(profile.profile_type.as_deref(), Some("Audio") | Some("Video")) {
            push_codecs(&mut direct_play_codecs, profile.audio_codec.as_deref());
        }
    }

    let mut transcoding_codecs = Vec::new();
    for profile in &wire.transcoding_profiles {
        push_codecs(&mut transcoding_codecs, profile.audio_codec.as_deref());
    }

    let mut channel_limits = Vec::new();
    for codec_profile in &wire.codec_profiles {
        let applies_to_audio = matches!(
            codec_profile.profile_type.as_deref(),
            Some("Audio") | Some("VideoAudio")
        );
        for condition in &codec_profile.conditions {
            if condition.property.as_deref() != Some("AudioChannels") {
                continue;
            }
            if !matches!(
                condition.condition.as_deref(),
                Some("LessThanEqual") | Some("Equals")
            ) {
                continue;
            }
            if let Some(max) = condition.value.as_deref().and_then(|v| v.parse::<u32>().ok()) {
                channel_limits.push(ChannelLimit {
                    applies_to_audio,
                    max_channels: max,
                });
            }
        }
    }

    DeviceProfile {
        name: wire
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| fallback_name.map(str::to_string))
            .unwrap_or_default(),
        direct_play_codecs,
        transcoding_codecs,
        channel_limits,
        max_static_bitrate: wire.max_static_bitrate.and_then(|v| u64::try_from(v).ok()),
        max_static_music_bitrate: wire
            .max_static_music_bitrate
            .and_then(|v| u64::try_from(v).ok()),
    }
}

/// Append the entries of a comma-separated codec list, trimmed, skipping
/// empties.
fn push_codecs(out: &mut Vec<String>, list: Option<&str>) {
    for codec in list.unwrap_or("").split(',') {
        let codec = codec.trim();
        if !codec.is_empty() {
            out.push(codec.to_string());
        }
    }
}

/// Extract the audio tracks of a media source as core candidates.
///
/// Non-audio streams and streams without an index are dropped here; the
/// selection core only ever sees audio tracks.
pub fn audio_tracks(streams: &[types::MediaStream]) -> Vec<AudioTrack> {
    streams
        .iter()
        .filter(|stream| stream.stream_type == Some(types::MediaStreamType::Audio))
        .filter_map(|stream| {
            let index = stream.index?;
            Some(AudioTrack {
                index,
                codec: stream.codec.clone().unwrap_or_default(),
                channels: stream
                    .channels
                    .and_then(|c| u32::try_from(c).ok())
                    .filter(|&c| c > 0),
                bit_rate: stream
                    .bit_rate
                    .and_then(|b| u64::try_from(b).ok())
                    .filter(|&b| b > 0),
                spatial_format: spatial_format(stream),
                language: stream.language.clone(),
                title: stream.display_title.clone().or_else(|| stream.title.clone()),
            })
        })
        .collect()
}

/// Spatial format of a stream, preferring the explicit field and falling
/// back to sniffing the codec profile string on older servers.
fn spatial_format(stream: &types::MediaStream) -> SpatialFormat {
    if let Some(format) = stream.audio_spatial_format.as_deref() {
        match format {
            "DolbyAtmos" => return SpatialFormat::DolbyAtmos,
            "DTSX" => return SpatialFormat::DtsX,
            "None" => return SpatialFormat::None,
            other if !other.is_empty() => return SpatialFormat::Other,
            _ => {}
        }
    }
    let profile = stream.profile.as_deref().unwrap_or("").to_lowercase();
    if profile.contains("atmos") {
        SpatialFormat::DolbyAtmos
    } else if profile.contains("dts:x") || profile.contains("dts-x") {
        SpatialFormat::DtsX
    } else {
        SpatialFormat::None
    }
}

/// Pull one field out of a MediaBrowser/Emby authorization header, e.g.
/// `Client` from `MediaBrowser Client="Swiftfin iOS", DeviceId="abc", ...`.
pub fn auth_field(header: &str, field: &str) -> Option<String> {
    let params = header.split_once(' ').map(|(_, rest)| rest).unwrap_or(header);
    for part in params.split(',') {
        if let Some((key, value)) = part.trim().split_once('=') {
            if key.trim().eq_ignore_ascii_case(field) {
                return Some(value.trim().trim_matches('"').to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_profile() -> types::DeviceProfile {
        serde_json::from_value(serde_json::json!({
            "Name": "Apple TV",
            "DirectPlayProfiles": [
                { "Type": "Video", "VideoCodec": "h264,hevc", "AudioCodec": "eac3,ac3,aac" },
                { "Type": "Audio", "AudioCodec": "flac, alac" },
                { "Type": "Photo" }
            ],
            "TranscodingProfiles": [
                { "Type": "Video", "AudioCodec": "aac", "Protocol": "hls" }
            ],
            "CodecProfiles": [
                {
                    "Type": "VideoAudio",
                    "Codec": "eac3",
                    "Conditions": [
                        { "Condition": "LessThanEqual", "Property": "AudioChannels", "Value": "6" },
                        { "Condition": "Equals", "Property": "IsSecondaryAudio", "Value": "false" }
                    ]
                },
                {
                    "Type": "Video",
                    "Conditions": [
                        { "Condition": "LessThanEqual", "Property": "AudioChannels", "Value": "2" }
                    ]
                }
            ],
            "MaxStaticBitrate": 100000000
        }))
        .unwrap()
    }

    #[test]
    fn test_device_profile_conversion() {
        let profile = device_profile(&wire_profile(), None);
        assert_eq!(profile.name, "Apple TV");
        assert_eq!(
            profile.direct_play_codecs,
            vec!["eac3", "ac3", "aac", "flac", "alac"]
        );
        assert_eq!(profile.transcoding_codecs, vec!["aac"]);
        assert_eq!(profile.max_static_bitrate, Some(100_000_000));
        assert_eq!(profile.max_static_music_bitrate, None);
        // Only the AudioChannels conditions become limits; the Video-typed
        // one is kept but marked as not applying to audio.
        assert_eq!(profile.channel_limits.len(), 2);
        assert!(profile.channel_limits[0].applies_to_audio);
        assert_eq!(profile.channel_limits[0].max_channels, 6);
        assert!(!profile.channel_limits[1].applies_to_audio);
    }

    #[test]
    fn test_codec_list_splitting() {
        let wire: types::DeviceProfile = serde_json::from_value(serde_json::json!({
            "DirectPlayProfiles": [
                { "Type": "Audio", "AudioCodec": " aac ,,eac3, " },
                { "Type": "Audio" }
            ]
        }))
        .unwrap();
        let profile = device_profile(&wire, None);
        assert_eq!(profile.direct_play_codecs, vec!["aac", "eac3"]);
    }

    #[test]
    fn test_device_profile_name_fallback() {
        let mut wire = wire_profile();
        wire.name = None;
        assert_eq!(device_profile(&wire, Some("Swiftfin tvOS")).name, "Swiftfin tvOS");
        wire.name = Some("  ".to_string());
        assert_eq!(device_profile(&wire, Some("Swiftfin tvOS")).name, "Swiftfin tvOS");
        assert_eq!(device_profile(&wire, None).name, "");
    }

    #[test]
    fn test_audio_tracks_filters_non_audio() {
        let streams: Vec<types::MediaStream> = serde_json::from_value(serde_json::json!([
            { "Index": 0, "Type": "Video", "Codec": "hevc" },
            { "Index": 1, "Type": "Audio", "Codec": "truehd", "Channels": 8,
              "BitRate": 3500000, "Language": "eng",
              "Profile": "Dolby TrueHD + Dolby Atmos" },
            { "Index": 2, "Type": "Audio", "Codec": "aac", "Channels": -1, "BitRate": 0 },
            { "Index": 3, "Type": "Subtitle", "Codec": "subrip" },
            { "Type": "Audio", "Codec": "ac3" }
        ]))
        .unwrap();
        let tracks = audio_tracks(&streams);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].index, 1);
        assert_eq!(tracks[0].spatial_format, SpatialFormat::DolbyAtmos);
        assert_eq!(tracks[0].bit_rate, Some(3_500_000));
        // Negative channels and zero bitrate degrade to unknown.
        assert_eq!(tracks[1].channels, None);
        assert_eq!(tracks[1].bit_rate, None);
    }

    #[test]
    fn test_spatial_format_field_wins_over_profile_string() {
        let stream: types::MediaStream = serde_json::from_value(serde_json::json!({
            "Index": 1, "Type": "Audio", "Codec": "truehd",
            "AudioSpatialFormat": "None",
            "Profile": "Dolby TrueHD + Dolby Atmos"
        }))
        .unwrap();
        let tracks = audio_tracks(&[stream]);
        assert_eq!(tracks[0].spatial_format, SpatialFormat::None);
    }

    #[test]
    fn test_spatial_format_dtsx() {
        let stream: types::MediaStream = serde_json::from_value(serde_json::json!({
            "Index": 1, "Type": "Audio", "Codec": "dts",
            "Profile": "DTS-HD MA + DTS:X"
        }))
        .unwrap();
        let tracks = audio_tracks(&[stream]);
        assert_eq!(tracks[0].spatial_format, SpatialFormat::DtsX);
    }

    #[test]
    fn test_auth_field() {
        let header = r#"MediaBrowser Client="Swiftfin iOS", Device="Apple TV", DeviceId="abc123", Version="1.0", Token="tok""#;
        assert_eq!(auth_field(header, "Client").as_deref(), Some("Swiftfin iOS"));
        assert_eq!(auth_field(header, "DeviceId").as_deref(), Some("abc123"));
        assert_eq!(auth_field(header, "deviceid").as_deref(), Some("abc123"));
        assert_eq!(auth_field(header, "Missing"), None);
        assert_eq!(auth_field("Bearer tok", "DeviceId"), None);
    }
}
