//! Initialization helpers for the application startup.

use crate::config::Config;
use crate::upstream::{FilterApi, UpstreamError};
use tracing::{error, info};

/// Sets up the tracing subscriber with the configured filter and format.
pub fn setup_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = config.logging.level.clone();

        // Keep HTTP plumbing quiet unless explicitly requested
        for target in ["hyper", "hyper_util", "reqwest"] {
            if !filter.contains(target) {
                filter.push_str(&format!(",{}=warn", target));
            }
        }

        tracing_subscriber::EnvFilter::new(filter)
    });

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Probes the appliance once before the server starts listening. The reply
/// must be a JSON object; there is no retry.
pub async fn startup_check(api: &dyn FilterApi) -> Result<(), UpstreamError> {
    info!("Checking API connection...");
    match api.client_info().await {
        Ok(info) if info.is_object() => {
            info!("PIHOLE API connection verified");
            Ok(())
        }
        Ok(other) => {
            error!("Invalid JSON response from API: {}", other);
            Err(UpstreamError::InvalidResponse(
                "client info is not a JSON object".to_string(),
            ))
        }
        Err(e) => {
            error!("Failed to connect to PIHOLE API: {}", e);
            Err(e)
        }
    }
}
