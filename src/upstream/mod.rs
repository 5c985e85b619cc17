mod client;
mod error;
pub mod types;

pub use client::{encode_pattern, PiholeClient};
pub use error::UpstreamError;
pub use types::{BlockingReply, BlockingStatus, BlockingUpdate, DomainRule, RuleUpdate};

use async_trait::async_trait;
use serde_json::Value;

/// Operations this service needs from the filtering appliance's REST API.
#[async_trait]
pub trait FilterApi: Send + Sync {
    /// `GET /domains/deny/regex`
    async fn list_regex_denies(&self) -> Result<Vec<DomainRule>, UpstreamError>;

    /// `PUT /domains/deny/regex/{pattern}`. Returns the raw reply body.
    async fn update_regex_deny(
        &self,
        pattern: &str,
        update: &RuleUpdate,
    ) -> Result<Value, UpstreamError>;

    /// `GET /dns/blocking`
    async fn blocking(&self) -> Result<BlockingReply, UpstreamError>;

    /// `POST /dns/blocking`. Returns the raw reply body.
    async fn set_blocking(&self, update: &BlockingUpdate) -> Result<Value, UpstreamError>;

    /// `GET /info/client`, used as a connectivity probe.
    async fn client_info(&self) -> Result<Value, UpstreamError>;
}
