use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::common::{JoinRequest, JoinResponse};
use crate::ws::attendance::{emit, payload};
use crate::{response::ApiResponse, state::AppContext};
use services::error::AttendanceError;
use services::store::{SessionStore, SubmitOutcome};

/// POST /api/join/{owner_id}/{session_id}
///
/// Records the student's attendance. Submission is idempotent per student
/// identity (or per exact name when no identity is supplied): resubmitting
/// never creates a second record.
///
/// ### Responses
/// - `201 Created` — recorded
/// - `200 OK` — already registered; still a success for the student
/// - `404 Not Found` — session ended or never existed
/// - `422 Unprocessable Entity` — name shorter than 2 characters
/// - `500 Internal Server Error` — storage failure
pub async fn submit_attendance(
    State(state): State<AppContext>,
    Path((owner_id, session_id)): Path<(String, String)>,
    Json(body): Json<JoinRequest>,
) -> (StatusCode, Json<ApiResponse<JoinResponse>>) {
    if let Err(errors) = body.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!("Invalid submission: {errors}"))),
        );
    }

    let outcome = state
        .join()
        .submit_attendance(
            &owner_id,
            &session_id,
            body.student_identity.as_deref(),
            &body.name,
        )
        .await;

    match outcome {
        Ok(SubmitOutcome::Recorded(record)) => {
            let count = match state.store().list_records(&owner_id, &session_id).await {
                Ok(records) => Some(records.len() as u64),
                Err(e) => {
                    tracing::warn!("Failed to count attendance records for {session_id}: {e}");
                    None
                }
            };
            emit::attendance_marked(
                state.app().ws(),
                payload::AttendanceMarked {
                    session_id: session_id.clone(),
                    student_name: record.student_name.clone(),
                    joined_at: record.joined_at.to_rfc3339(),
                    count,
                },
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    JoinResponse {
                        session_id,
                        name: record.student_name,
                        already_registered: false,
                    },
                    "Attendance recorded",
                )),
            )
        }
        Ok(SubmitOutcome::AlreadyRegistered) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                JoinResponse {
                    session_id,
                    name: body.name.trim().to_string(),
                    already_registered: true,
                },
                "Attendance was already recorded for this session",
            )),
        ),
        Ok(SubmitOutcome::SessionNotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Class session not found")),
        ),
        Err(AttendanceError::ValidationFailed { field, message }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!("Invalid {field}: {message}"))),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to record attendance: {e}"))),
        ),
    }
}
