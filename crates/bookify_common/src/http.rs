// --- File: crates/bookify_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{BookifyError, HttpStatusCode};

/// Implement IntoResponse for BookifyError so handlers can return it directly.
///
/// The body mirrors the booking response shape: `{ "ok": false, "error", "code" }`.
impl IntoResponse for BookifyError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("Request failed with {}: {}", status_code, self);
        }

        let body = Json(json!({
            "ok": false,
            "error": self.to_string(),
            "code": status_code.as_u16(),
        }));

        (status_code, body).into_response()
    }
}

