use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use pihole_toggle::api::{start_api_server, ApiState};
use pihole_toggle::config::Config;
use pihole_toggle::init::{setup_logging, startup_check};
use pihole_toggle::store::ProxyStore;
use pihole_toggle::upstream::PiholeClient;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config_found = std::path::Path::new(&config_path).exists();
    let mut config = if config_found {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };
    config.apply_env()?;
    config.validate()?;

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting pihole-toggle...");
    if !config_found {
        info!("Config file not found, using defaults.");
    }

    // 3. Upstream client + connectivity probe
    let client = Arc::new(
        PiholeClient::new(config.pihole_api_url.clone())
            .context("Failed to build HTTP client")?,
    );
    startup_check(client.as_ref())
        .await
        .context("Startup check failed")?;

    // 4. Serve
    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("Invalid host address: {}", config.host))?,
        config.app_port,
    );
    info!("PIHOLE API URL: {}", config.pihole_api_url);

    let state = ApiState::new(client, ProxyStore::new(), config);
    start_api_server(state, addr, async {
        let _ = signal::ctrl_c().await;
        info!("Shutdown signal received.");
    })
    .await
}
