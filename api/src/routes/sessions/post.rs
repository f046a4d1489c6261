use axum::{Extension, Json, extract::State, http::StatusCode};

use super::common::SessionResponse;
use crate::{auth::AuthUser, response::ApiResponse, state::AppContext};
use services::error::AttendanceError;

/// POST /api/sessions
///
/// Starts a new attendance session for the authenticated owner and begins
/// the proximity advertisement. The response carries the join URL and the
/// QR image URL for the projector view.
///
/// ### Responses
/// - `201 Created` with the session payload
/// - `401 Unauthorized` when no owner identity is established
/// - `500 Internal Server Error` on storage failure
pub async fn create_session(
    State(state): State<AppContext>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match state.sessions().start_session(&claims.sub).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SessionResponse::from(session),
                "Class session started",
            )),
        ),
        Err(AttendanceError::AuthUnavailable) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("No owner identity established")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to start session: {e}"))),
        ),
    }
}
