use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A regex deny rule as reported by the appliance.
///
/// `enabled: true` means the rule is active on the appliance. The UI shows
/// such a rule as "disabled" (red); that inversion is kept as observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    pub id: i64,
    pub domain: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainList {
    pub domains: Vec<DomainRule>,
}

/// Body of `PUT /domains/deny/regex/{pattern}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleUpdate {
    pub enabled: bool,
    pub comment: Option<String>,
}

/// Body of `POST /dns/blocking`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockingUpdate {
    pub blocking: bool,
    pub timer: u64,
}

/// Raw reply of `GET /dns/blocking`.
///
/// `blocking` is one of "enabled", "disabled", "failed" or "unknown".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockingReply {
    #[serde(default)]
    pub blocking: Option<String>,
    #[serde(default)]
    pub timer: Option<Value>,
}

impl BlockingReply {
    pub fn into_status(self) -> BlockingStatus {
        BlockingStatus {
            blocking: self.blocking.as_deref() == Some("enabled"),
            timer: self.timer.as_ref().map(timer_secs).unwrap_or(0),
        }
    }
}

/// Global ad-blocking state as served to the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingStatus {
    pub blocking: bool,
    pub timer: u64,
}

/// Whole seconds from a JSON number or numeric string; anything else is 0.
pub fn timer_secs(value: &Value) -> u64 {
    let secs = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match secs {
        Some(s) if s.is_finite() && s > 0.0 => s.trunc() as u64,
        _ => 0,
    }
}
