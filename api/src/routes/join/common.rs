use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of a student attendance submission.
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 2, max = 100, message = "name must be 2 to 100 characters"))]
    pub name: String,
    /// Stable per-student identity when the device has one; the name is
    /// the dedup fallback otherwise.
    pub student_identity: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct JoinResponse {
    pub session_id: String,
    pub name: String,
    pub already_registered: bool,
}

#[derive(Debug, Serialize, Default)]
pub struct JoinabilityResponse {
    pub joinable: bool,
}

#[derive(Debug, Serialize, Default)]
pub struct SuccessPageResponse {
    pub name: String,
    pub message: String,
}
