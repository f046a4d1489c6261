use axum::{Json, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::claims::generate_token;
use crate::response::ApiResponse;

#[derive(Serialize, Default)]
pub struct AnonymousAuthResponse {
    pub token: String,
    pub owner_id: String,
    pub expires_at: i64,
}

/// POST /api/auth/anonymous
///
/// Mints a fresh anonymous owner identity and a signed token for it. Every
/// call produces a new identity; clients keep the token for the lifetime
/// of their sessions.
///
/// ### Responses
/// - `200 OK` with `{token, owner_id, expires_at}`
/// - `500 Internal Server Error` if signing fails
pub async fn anonymous_login() -> (StatusCode, Json<ApiResponse<AnonymousAuthResponse>>) {
    let owner_id = Uuid::new_v4().to_string();
    match generate_token(&owner_id) {
        Ok((token, expires_at)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AnonymousAuthResponse {
                    token,
                    owner_id,
                    expires_at,
                },
                "Signed in anonymously",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to issue token: {e}"))),
        ),
    }
}
