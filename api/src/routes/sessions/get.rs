use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::common::{RecordResponse, SessionResponse};
use crate::{auth::AuthUser, response::ApiResponse, state::AppContext};
use services::error::AttendanceError;

/// GET /api/sessions/current
///
/// The owner's running session, or `null` data when none is active. A
/// reference left behind by a session deleted elsewhere is cleared here.
///
/// ### Responses
/// - `200 OK` with the session payload or `null`
pub async fn get_current_session(
    State(state): State<AppContext>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Option<SessionResponse>>>) {
    match state.sessions().current_session(&claims.sub).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                session.map(SessionResponse::from),
                "Current session",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!(
                "Failed to load current session: {e}"
            ))),
        ),
    }
}

/// GET /api/sessions/{session_id}/records
///
/// All attendance records of the owner's session, ascending by join time.
///
/// ### Responses
/// - `200 OK` with the record list
/// - `404 Not Found` when the session does not exist for this owner
pub async fn list_session_records(
    State(state): State<AppContext>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<RecordResponse>>>) {
    match state.sessions().list_records(&claims.sub, &session_id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                records.into_iter().map(RecordResponse::from).collect(),
                "Attendance records",
            )),
        ),
        Err(AttendanceError::SessionNotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Class session not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to list records: {e}"))),
        ),
    }
}
