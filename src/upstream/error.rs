use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request failed with status code {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed JSON from filtering API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid response from filtering API: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// HTTP status reported by the appliance, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
