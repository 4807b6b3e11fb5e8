//! HTTP responder for `ApiError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal detail stays in the log; clients get a generic message.
        let message = if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
            "Server Error".to_string()
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "request rejected");
            self.message
        };

        (
            status,
            Json(json!({
                "success": false,
                "message": message,
            })),
        )
            .into_response()
    }
}
