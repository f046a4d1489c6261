use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::guards::Empty;
use crate::ws::attendance::{emit, payload};
use crate::{auth::AuthUser, response::ApiResponse, state::AppContext};

/// DELETE /api/sessions/{session_id}
///
/// Ends the session: the session and its records are deleted and joining
/// stops immediately. Idempotent; ending a session twice is still `200`.
///
/// ### Responses
/// - `200 OK`
/// - `500 Internal Server Error` on storage failure
pub async fn end_session(
    State(state): State<AppContext>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match state
        .sessions()
        .end_session_by_id(&claims.sub, &session_id)
        .await
    {
        Ok(()) => {
            emit::session_deleted(
                state.app().ws(),
                payload::SessionDeleted {
                    session_id: session_id.clone(),
                },
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(Empty, "Class session ended")),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to end session: {e}"))),
        ),
    }
}
