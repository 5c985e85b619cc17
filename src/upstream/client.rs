use super::error::UpstreamError;
use super::types::{BlockingReply, BlockingUpdate, DomainList, DomainRule, RuleUpdate};
use super::FilterApi;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

/// reqwest-backed [`FilterApi`] talking to a Pi-hole style REST API.
///
/// Certificate validation is disabled: appliances on a LAN almost always
/// serve self-signed certificates.
#[derive(Debug, Clone)]
pub struct PiholeClient {
    client: Client,
    base_url: String,
}

impl PiholeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .user_agent(concat!("pihole-toggle/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the reply as JSON (`null` when empty).
    /// Any non-2xx status becomes [`UpstreamError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            };
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Escapes a rule pattern for use as a single path segment. Everything but
/// `A-Z a-z 0-9 - _ . ~` is percent-encoded, parentheses included.
pub fn encode_pattern(pattern: &str) -> String {
    urlencoding::encode(pattern).into_owned()
}

#[async_trait]
impl FilterApi for PiholeClient {
    async fn list_regex_denies(&self) -> Result<Vec<DomainRule>, UpstreamError> {
        let url = self.url("/domains/deny/regex");
        debug!(%url, "GET");
        let value = self.send(self.client.get(&url)).await?;
        let list: DomainList = serde_json::from_value(value)?;
        Ok(list.domains)
    }

    async fn update_regex_deny(
        &self,
        pattern: &str,
        update: &RuleUpdate,
    ) -> Result<Value, UpstreamError> {
        let url = self.url(&format!("/domains/deny/regex/{}", encode_pattern(pattern)));
        debug!(%url, enabled = update.enabled, "PUT");
        self.send(self.client.put(&url).json(update)).await
    }

    async fn blocking(&self) -> Result<BlockingReply, UpstreamError> {
        let url = self.url("/dns/blocking");
        debug!(%url, "GET");
        let value = self.send(self.client.get(&url)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn set_blocking(&self, update: &BlockingUpdate) -> Result<Value, UpstreamError> {
        let url = self.url("/dns/blocking");
        debug!(%url, blocking = update.blocking, timer = update.timer, "POST");
        self.send(self.client.post(&url).json(update)).await
    }

    async fn client_info(&self) -> Result<Value, UpstreamError> {
        let url = self.url("/info/client");
        debug!(%url, "GET");
        self.send(self.client.get(&url)).await
    }
}
