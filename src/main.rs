use clap::Parser;

use jellyfin_audio_proxy::config::Config;
use jellyfin_audio_proxy::error::{AudioProxyError, Result};
use jellyfin_audio_proxy::server;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate().map_err(AudioProxyError::Config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("jellyfin_audio_proxy={},tower_http=info", config.log_level).into()
            }),
        )
        .init();

    server::run(config).await
}
