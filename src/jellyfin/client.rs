//! Upstream Jellyfin HTTP client.
//!
//! Used both for forwarding intercepted requests and for the session
//! commands the track corrector sends on its own behalf.

use std::collections::HashMap;

use axum::http::HeaderMap;
use reqwest::Method;

use crate::config::Config;
use crate::error::{AudioProxyError, Result};
use crate::jellyfin::types::{GeneralCommand, SessionInfo};

/// HTTP client bound to one Jellyfin server.
#[derive(Clone)]
pub struct JellyfinClient {
    base_url: String,
    http: reqwest::Client,
}

impl JellyfinClient {
    /// Create a client from configuration. Redirects are not followed so
    /// upstream `Location` headers reach the real client untouched.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            base_url: config.jellyfin_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base URL of the upstream server, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against the upstream server for a path and query.
    pub fn request(&self, method: Method, path_query: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path_query))
    }

    /// Resolve the session id belonging to a device, using the caller's
    /// auth headers.
    pub async fn find_session_id(
        &self,
        device_id: &str,
        auth: &HeaderMap,
    ) -> Result<Option<String>> {
        let sessions: Vec<SessionInfo> = self
            .request(Method::GET, "/Sessions")
            .query(&[("deviceId", device_id)])
            .headers(auth.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sessions.into_iter().find_map(|session| session.id))
    }

    /// Tell a session to switch to the given audio stream index.
    pub async fn set_audio_stream_index(
        &self,
        session_id: &str,
        index: i32,
        auth: &HeaderMap,
    ) -> Result<()> {
        let command = GeneralCommand {
            name: "SetAudioStreamIndex".to_string(),
            arguments: HashMap::from([("Index".to_string(), index.to_string())]),
        };
        let response = self
            .request(Method::POST, &format!("/Sessions/{}/Command", session_id))
            .headers(auth.clone())
            .json(&command)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AudioProxyError::Command(format!(
                "session {} answered {}",
                session_id,
                response.status()
            )));
        }
        Ok(())
    }
}
