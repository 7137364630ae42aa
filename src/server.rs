//! Axum server setup and shared application state.

use axum::{
    routing::{get, post},
    Router,
};
use dashmap::DashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::config::Config;
use crate::error::Result;
use crate::handler::fallback::fallback_proxy;
use crate::handler::playbackinfo::playback_info_handler;
use crate::handler::sessions::playback_start_handler;
use crate::handler::TrackDecision;
use crate::jellyfin::client::JellyfinClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub client: JellyfinClient,
    /// Chosen track per play session and media source.
    pub decisions: DashMap<String, TrackDecision>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = JellyfinClient::new(&config)?;
        Ok(Self {
            config,
            client,
            decisions: DashMap::new(),
        })
    }
}

/// Create the main router for the application.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        // Playback info interception: rewrite the default audio stream
        .route("/Items/{item_id}/PlaybackInfo", post(playback_info_handler))
        // Playback start reports: correct the track after the fact
        .route("/Sessions/Playing", post(playback_start_handler))
        // Everything else passes through to Jellyfin
        .fallback(fallback_proxy)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Run the HTTP server until it is shut down.
pub async fn run(config: Config) -> Result<()> {
    let bind = config.bind;
    let jellyfin_url = config.jellyfin_url.clone();

    let state = Arc::new(AppState::new(config)?);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", bind);
    info!("Proxying to {}", jellyfin_url);

    axum::serve(listener, router).await?;

    Ok(())
}
