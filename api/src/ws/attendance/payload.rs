use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMarked {
    pub session_id: String,
    pub student_name: String,
    pub joined_at: String, // RFC3339
    /// Running record count after this one. Omitted when the count lookup
    /// failed; a missing count is better than a wrong one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDeleted {
    pub session_id: String,
}
