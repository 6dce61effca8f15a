use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::errors::DispatchError;

/// Wraps the workflow error so handlers can use `?` straight into an HTTP
/// response.
pub struct ApiError(pub DispatchError);

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DispatchError::HostNotFound(_) | DispatchError::ContainerNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DispatchError::Conflict(_) => StatusCode::CONFLICT,
            DispatchError::NoCapacity | DispatchError::MetricsUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            DispatchError::Transport { .. } | DispatchError::Protocol { .. } => {
                StatusCode::BAD_GATEWAY
            }
            DispatchError::Persistence(_) | DispatchError::Inconsistent { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(error = %self.0, status = %status, "request failed");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
