use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_app_port")]
    pub app_port: u16,

    #[serde(default = "default_pihole_api_url")]
    pub pihole_api_url: String,

    // Public URL of this service when it sits behind a reverse proxy.
    #[serde(default)]
    pub back_end_url: String,

    #[serde(default = "default_num")]
    pub default_num: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Defaults
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_app_port() -> u16 {
    3000
}
fn default_pihole_api_url() -> String {
    "http://localhost:3001/api".to_string()
}
fn default_num() -> usize {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            app_port: default_app_port(),
            pihole_api_url: default_pihole_api_url(),
            back_end_url: String::new(),
            default_num: default_num(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Applies `APP_PORT`, `PIHOLE_API_URL` and `BACK_END_URL` on top of the
    /// file values.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("APP_PORT") {
            self.app_port = port
                .trim()
                .parse()
                .with_context(|| format!("APP_PORT is not a valid port: {port}"))?;
        }
        if let Some(url) = lookup("PIHOLE_API_URL") {
            self.pihole_api_url = url;
        }
        if let Some(url) = lookup("BACK_END_URL") {
            self.back_end_url = url;
        }
        Ok(())
    }

    /// Checks the upstream base URL and strips any trailing slash from it.
    pub fn validate(&mut self) -> Result<()> {
        let parsed = Url::parse(&self.pihole_api_url)
            .with_context(|| format!("Invalid PIHOLE_API_URL: {}", self.pihole_api_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "PIHOLE_API_URL must use http or https, got '{}'",
                parsed.scheme()
            );
        }
        let trimmed = self.pihole_api_url.trim_end_matches('/').len();
        self.pihole_api_url.truncate(trimmed);
        if self.default_num == 0 {
            self.default_num = default_num();
        }
        Ok(())
    }
}
