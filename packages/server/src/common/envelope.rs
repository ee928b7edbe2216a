use axum::{response::IntoResponse, response::Response, Json};
use serde::Serialize;
use serde_json::json;

/// Success envelope for the public API.
///
/// Every successful operation responds with `{"success": true, "body": ...}`;
/// errors respond with `{"error": ...}` (see `domains::auth::AuthError`).
pub struct ApiSuccess<T>(pub T);

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        Json(json!({
            "success": true,
            "body": self.0,
        }))
        .into_response()
    }
}
