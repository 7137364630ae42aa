//! Configuration for the audio selection proxy.

use clap::Parser;
use std::net::SocketAddr;

/// Jellyfin audio track selection proxy configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "jellyfin-audio-proxy")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind the proxy server to.
    #[arg(short = 'b', long, default_value = "127.0.0.1:8097")]
    pub bind: SocketAddr,

    /// Jellyfin backend URL.
    #[arg(short = 'j', long, default_value = "http://127.0.0.1:8096")]
    pub jellyfin_url: String,

    /// Preferred audio language (ISO 639 code), used as a scoring tiebreak.
    #[arg(short = 'l', long, default_value = "eng")]
    pub preferred_language: String,

    /// Disable track selection and run as a plain passthrough proxy.
    #[arg(long)]
    pub no_selection: bool,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Whether track selection is enabled.
    pub fn selection_enabled(&self) -> bool {
        !self.no_selection
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.jellyfin_url.starts_with("http://") && !self.jellyfin_url.starts_with("https://")
        {
            return Err("Jellyfin URL must start with http:// or https://".to_string());
        }
        if self.preferred_language.trim().is_empty() {
            return Err("Preferred language must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::parse_from(["jellyfin-audio-proxy"]);
        assert!(config.validate().is_ok());
        assert!(config.selection_enabled());
        assert_eq!(config.preferred_language, "eng");
    }

    #[test]
    fn test_rejects_bad_url() {
        let config =
            Config::parse_from(["jellyfin-audio-proxy", "--jellyfin-url", "ftp://nope"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_language() {
        let config =
            Config::parse_from(["jellyfin-audio-proxy", "--preferred-language", " "]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_selection_flag() {
        let config = Config::parse_from(["jellyfin-audio-proxy", "--no-selection"]);
        assert!(!config.selection_enabled());
    }
}
