use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::common::{JoinabilityResponse, SuccessPageResponse};
use crate::{response::ApiResponse, state::AppContext};
use services::join::FALLBACK_NAME;

/// GET /api/join/{owner_id}/{session_id}
///
/// Joinability probe run by the landing page before it shows the name
/// form. A session that ended or never existed is simply not joinable.
///
/// ### Responses
/// - `200 OK` with `{joinable}`
pub async fn check_join(
    State(state): State<AppContext>,
    Path((owner_id, session_id)): Path<(String, String)>,
) -> (StatusCode, Json<ApiResponse<JoinabilityResponse>>) {
    match state
        .join()
        .check_session_joinable(&owner_id, &session_id)
        .await
    {
        Ok(joinable) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                JoinabilityResponse { joinable },
                if joinable {
                    "Session is open"
                } else {
                    "Class session not found"
                },
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to check session: {e}"))),
        ),
    }
}

#[derive(Deserialize)]
pub struct SuccessQuery {
    pub name: Option<String>,
}

/// GET /api/join/{owner_id}/{session_id}/success?name=…
///
/// Confirmation-page payload. Pure presentation: no storage reads; the
/// name falls back to "Student" when the query carries none.
pub async fn join_success(
    Path((_owner_id, _session_id)): Path<(String, String)>,
    Query(query): Query<SuccessQuery>,
) -> (StatusCode, Json<ApiResponse<SuccessPageResponse>>) {
    let name = query
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());
    let message = format!("Your attendance has been recorded, {name}.");
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            SuccessPageResponse { name, message },
            "Attendance confirmed",
        )),
    )
}
