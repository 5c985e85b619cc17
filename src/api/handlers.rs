use super::error::ApiError;
use super::ApiState;
use crate::upstream::types::timer_secs;
use crate::upstream::{BlockingStatus, BlockingUpdate, DomainRule, RuleUpdate};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Serialize)]
pub struct ConfigView {
    #[serde(rename = "APP_PORT")]
    app_port: u16,
    #[serde(rename = "PIHOLE_API_URL")]
    pihole_api_url: String,
    #[serde(rename = "BACK_END_URL", skip_serializing_if = "String::is_empty")]
    back_end_url: String,
}

pub async fn get_config(State(state): State<Arc<ApiState>>) -> Json<ConfigView> {
    Json(ConfigView {
        app_port: state.config.app_port,
        pihole_api_url: state.config.pihole_api_url.clone(),
        back_end_url: state.config.back_end_url.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct NumQuery {
    num: Option<String>,
}

/// Reads the leading integer of `raw`, ignoring any trailing garbage
/// ("3abc" is 3). Missing, unparsable and non-positive values give `default`;
/// positive values too large for `usize` saturate.
pub(crate) fn parse_num(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    let s = raw.trim_start();
    if s.starts_with('-') {
        return default;
    }
    let digits = s.strip_prefix('+').unwrap_or(s);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.bytes().all(|b| b == b'0') {
        return default;
    }
    digits.parse().unwrap_or(usize::MAX)
}

/// Fetches every deny rule, re-indexes all of them and returns the first
/// `num`. Mutations can only target ids present in the last full fetch.
pub async fn get_domain_status_all(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<NumQuery>,
) -> Result<Json<BTreeMap<i64, DomainRule>>, ApiError> {
    let rules = state
        .upstream
        .list_regex_denies()
        .await
        .map_err(ApiError::upstream("Failed to get domain status all"))?;
    state.store.replace_rules(rules);

    refresh_blocking_status(&state).await;

    let num = parse_num(query.num.as_deref(), state.config.default_num);
    Ok(Json(state.store.first_rules(num)))
}

/// Rule ids arrive as numbers or, from HTML data attributes, as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RuleId {
    Number(i64),
    Text(String),
}

impl RuleId {
    fn resolve(&self) -> Option<i64> {
        let id = match self {
            RuleId::Number(n) => *n,
            RuleId::Text(s) => s.trim().parse().ok()?,
        };
        (id != 0).then_some(id)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetDomainStatusRequest {
    #[serde(default)]
    id: Option<RuleId>,
    #[serde(default)]
    enabled: Option<bool>,
}

/// Flips one deny rule on the appliance. A request without `id`/`enabled`, or
/// naming an id absent from the last fetch, is skipped with an empty 204.
pub async fn set_domain_status(
    State(state): State<Arc<ApiState>>,
    request: Result<Json<SetDomainStatusRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    let Some((id, enabled)) = request
        .id
        .as_ref()
        .and_then(RuleId::resolve)
        .zip(request.enabled)
    else {
        warn!("setDomainStatus called without id or enabled; nothing to do");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let Some(rule) = state.store.rule(id) else {
        warn!(id, "Rule id not in the last fetched list; skipping update");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let update = RuleUpdate {
        enabled,
        comment: rule.comment.clone(),
    };
    let reply = state
        .upstream
        .update_regex_deny(&rule.domain, &update)
        .await
        .map_err(ApiError::upstream("Failed to set domain status"))?;

    info!(id, domain = %rule.domain, enabled, "Domain rule updated");
    Ok(Json(reply).into_response())
}

pub async fn get_blocking_status(State(state): State<Arc<ApiState>>) -> Json<BlockingStatus> {
    Json(refresh_blocking_status(&state).await)
}

/// Pulls the current blocking state into the store. On failure the last
/// known state is kept and returned.
async fn refresh_blocking_status(state: &ApiState) -> BlockingStatus {
    match state.upstream.blocking().await {
        Ok(reply) => {
            let status = reply.into_status();
            state.store.set_blocking_status(status);
            status
        }
        Err(e) => {
            error!("Error getting blocking status: {}", e);
            state.store.blocking_status()
        }
    }
}

/// Wraps a present value, `null` included, so only an absent key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct SetBlockingRequest {
    #[serde(default, deserialize_with = "present")]
    blocking: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    timer: Option<Value>,
}

/// Turns blocking on (timer forced to 0) or off for `timer` seconds. Only a
/// literal `true` enables; `null` or any other value disables. The store is
/// updated from the request values once the appliance accepts.
pub async fn set_blocking_status(
    State(state): State<Arc<ApiState>>,
    request: Result<Json<SetBlockingRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = request?;
    let (Some(blocking), Some(timer)) = (request.blocking, request.timer) else {
        return Err(ApiError::BadRequest {
            error: "Missing required parameters",
            message: "Both blocking and timer are required",
        });
    };

    let blocking = blocking == Value::Bool(true);
    let timer = if blocking { 0 } else { timer_secs(&timer) };
    let update = BlockingUpdate { blocking, timer };
    let reply = state
        .upstream
        .set_blocking(&update)
        .await
        .map_err(ApiError::upstream("Failed to set blocking status"))?;

    state
        .store
        .set_blocking_status(BlockingStatus { blocking, timer });
    info!(blocking, timer, "Blocking status updated");
    Ok(Json(reply))
}
