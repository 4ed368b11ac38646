use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rn_core::Error;
use serde_json::json;
use tracing::{error, warn};

/// Error body returned to clients: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            // passed through as-is
            Error::UpstreamFetch { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Error::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", err);
        } else {
            warn!("Request failed: {}", err);
        }

        let detail = match err {
            Error::UpstreamFetch { body, .. } if !body.is_empty() => body,
            other => other.to_string(),
        };
        Self { status, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
