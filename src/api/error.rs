use crate::upstream::UpstreamError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Failure of an API handler, rendered as `{"error", "message"}`.
#[derive(Debug)]
pub enum ApiError {
    /// The appliance call failed. Its status is passed through when known.
    Upstream {
        error: &'static str,
        source: UpstreamError,
    },
    BadRequest {
        error: &'static str,
        message: &'static str,
    },
    /// The request body was not the expected JSON.
    InvalidBody(JsonRejection),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl ApiError {
    pub fn upstream(error: &'static str) -> impl FnOnce(UpstreamError) -> Self {
        move |source| ApiError::Upstream { error, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream { source, .. } => source
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| !s.is_success())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Upstream { error, source } => {
                error!("{}: {}", error, source);
                ErrorBody {
                    error: error.to_string(),
                    message: source.to_string(),
                }
            }
            ApiError::BadRequest { error, message } => ErrorBody {
                error: error.to_string(),
                message: message.to_string(),
            },
            ApiError::InvalidBody(rejection) => ErrorBody {
                error: "Invalid request body".to_string(),
                message: rejection.body_text(),
            },
        };
        (status, Json(body)).into_response()
    }
}
