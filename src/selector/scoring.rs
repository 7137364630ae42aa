//! Weighted quality scoring for admissible audio tracks.
//!
//! Each individual score lands in [0, 100] before weighting; unknown or
//! malformed fields score zero rather than erroring.

use super::capability::max_channels;
use super::{AudioTrack, DeviceProfile, SpatialFormat};

const CODEC_WEIGHT: f64 = 0.40;
const CHANNEL_WEIGHT: f64 = 0.30;
const BITRATE_WEIGHT: f64 = 0.15;
const SPATIAL_WEIGHT: f64 = 0.10;
const LANGUAGE_WEIGHT: f64 = 0.05;

/// Reference ceiling for the linear bitrate ramp, 1.5 Mbps.
const BITRATE_REFERENCE: f64 = 1_500_000.0;

/// Combined weighted score for one track.
pub fn track_score(
    track: &AudioTrack,
    profile: Option<&DeviceProfile>,
    preferred_language: &str,
) -> f64 {
    CODEC_WEIGHT * codec_score(&track.codec)
        + CHANNEL_WEIGHT * channel_score(track.channels, profile)
        + BITRATE_WEIGHT * bitrate_score(track.bit_rate)
        + SPATIAL_WEIGHT * spatial_score(track.spatial_format)
        + LANGUAGE_WEIGHT * language_score(track.language.as_deref(), preferred_language)
}

/// Tiered codec quality score.
///
/// Tiers are checked lossless-first so codec strings matching several
/// patterns (e.g. "dts-hd ma" also contains "dts") land in the highest
/// applicable tier.
pub fn codec_score(codec: &str) -> f64 {
    let codec = codec.trim().to_lowercase();
    if codec.is_empty() {
        return 0.0;
    }
    // Lossless
    if codec.contains("truehd")
        || codec.contains("dts-hd ma")
        || codec.contains("dts-hdma")
        || matches!(codec.as_str(), "flac" | "pcm" | "alac")
    {
        return 100.0;
    }
    // High-quality lossy
    if matches!(codec.as_str(), "eac3" | "ec3" | "dts")
        || codec.contains("dts-hd hra")
        || codec.contains("dts-hdhra")
    {
        return 80.0;
    }
    if matches!(codec.as_str(), "ac3" | "aac") {
        return 60.0;
    }
    if matches!(codec.as_str(), "mp3" | "vorbis" | "opus") {
        return 40.0;
    }
    20.0
}

/// Reward for using more of the device's channel budget, capped at 100.
pub fn channel_score(channels: Option<u32>, profile: Option<&DeviceProfile>) -> f64 {
    match channels {
        Some(channels) if channels > 0 => {
            let ceiling = max_channels(profile) as f64;
            (100.0 * channels as f64 / ceiling).min(100.0)
        }
        _ => 0.0,
    }
}

/// Linear ramp up to the 1.5 Mbps reference ceiling.
pub fn bitrate_score(bit_rate: Option<u64>) -> f64 {
    match bit_rate {
        Some(bit_rate) if bit_rate > 0 => (100.0 * bit_rate as f64 / BITRATE_REFERENCE).min(100.0),
        _ => 0.0,
    }
}

/// Bonus for object-based surround formats.
pub fn spatial_score(format: SpatialFormat) -> f64 {
    match format {
        SpatialFormat::DolbyAtmos | SpatialFormat::DtsX => 10.0,
        SpatialFormat::None | SpatialFormat::Other => 0.0,
    }
}

/// Bonus when the track matches the preferred language.
pub fn language_score(language: Option<&str>, preferred: &str) -> f64 {
    match language {
        Some(language) if !language.is_empty() && !preferred.is_empty() => {
            if language.eq_ignore_ascii_case(preferred) {
                5.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::ChannelLimit;

    #[test]
    fn test_codec_tiers_monotonic() {
        let tiers = [
            ("truehd", 100.0),
            ("eac3", 80.0),
            ("ac3", 60.0),
            ("mp3", 40.0),
            ("wma", 20.0),
            ("", 0.0),
        ];
        for window in tiers.windows(2) {
            let (higher, lower) = (window[0], window[1]);
            assert!(
                codec_score(higher.0) > codec_score(lower.0),
                "{} should outrank {}",
                higher.0,
                lower.0
            );
        }
        for (codec, expected) in tiers {
            assert_eq!(codec_score(codec), expected, "{codec}");
        }
    }

    #[test]
    fn test_codec_overlapping_substrings() {
        // Contains "dts" but belongs to the lossless tier.
        assert_eq!(codec_score("dts-hd ma"), 100.0);
        assert_eq!(codec_score("DTS-HDMA"), 100.0);
        assert_eq!(codec_score("dts-hd hra"), 80.0);
        assert_eq!(codec_score("dts"), 80.0);
    }

    #[test]
    fn test_codec_lossless_exact_matches() {
        assert_eq!(codec_score("flac"), 100.0);
        assert_eq!(codec_score("pcm"), 100.0);
        assert_eq!(codec_score("alac"), 100.0);
        assert_eq!(codec_score("ec3"), 80.0);
        assert_eq!(codec_score("opus"), 40.0);
        assert_eq!(codec_score("vorbis"), 40.0);
    }

    #[test]
    fn test_channel_score_clamped() {
        // 32 channels against a stereo ceiling still caps at 100.
        assert_eq!(channel_score(Some(32), None), 100.0);
        assert_eq!(channel_score(Some(2), None), 100.0);
        assert_eq!(channel_score(Some(1), None), 50.0);
        assert_eq!(channel_score(None, None), 0.0);
        assert_eq!(channel_score(Some(0), None), 0.0);
    }

    #[test]
    fn test_channel_score_uses_profile_ceiling() {
        let profile = DeviceProfile {
            channel_limits: vec![ChannelLimit { applies_to_audio: true, max_channels: 6 }],
            ..Default::default()
        };
        assert_eq!(channel_score(Some(6), Some(&profile)), 100.0);
        assert_eq!(channel_score(Some(3), Some(&profile)), 50.0);
    }

    #[test]
    fn test_bitrate_score_ramp() {
        assert_eq!(bitrate_score(Some(1_500_000)), 100.0);
        assert_eq!(bitrate_score(Some(3_000_000)), 100.0);
        assert_eq!(bitrate_score(Some(750_000)), 50.0);
        assert_eq!(bitrate_score(None), 0.0);
        assert_eq!(bitrate_score(Some(0)), 0.0);
    }

    #[test]
    fn test_spatial_score() {
        assert_eq!(spatial_score(SpatialFormat::DolbyAtmos), 10.0);
        assert_eq!(spatial_score(SpatialFormat::DtsX), 10.0);
        assert_eq!(spatial_score(SpatialFormat::None), 0.0);
        assert_eq!(spatial_score(SpatialFormat::Other), 0.0);
    }

    #[test]
    fn test_language_score() {
        assert_eq!(language_score(Some("eng"), "eng"), 5.0);
        assert_eq!(language_score(Some("ENG"), "eng"), 5.0);
        assert_eq!(language_score(Some("fra"), "eng"), 0.0);
        assert_eq!(language_score(None, "eng"), 0.0);
        assert_eq!(language_score(Some(""), "eng"), 0.0);
        assert_eq!(language_score(Some("eng"), ""), 0.0);
    }
}
