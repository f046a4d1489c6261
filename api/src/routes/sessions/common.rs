use serde::Serialize;
use services::qr;
use services::session::{elapsed_seconds, format_elapsed};
use services::types::{AttendanceRecord, ClassSession};

/// Session payload returned to the lecturer dashboard, with the derived
/// elapsed time and the join/QR URLs the frontend renders.
#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: String,
    pub owner_id: String,
    pub start_time: String, // RFC3339
    pub active: bool,
    pub elapsed_seconds: i64,
    pub elapsed: String,
    pub join_url: String,
    pub qr_image_url: String,
}

impl From<ClassSession> for SessionResponse {
    fn from(s: ClassSession) -> Self {
        let join_url = qr::join_url(&util::config::frontend_url(), &s.owner_id, &s.id);
        let qr_image_url = qr::image_url(&join_url);
        let secs = elapsed_seconds(&s);
        Self {
            id: s.id,
            owner_id: s.owner_id,
            start_time: s.start_time.to_rfc3339(),
            active: s.active,
            elapsed_seconds: secs,
            elapsed: format_elapsed(secs),
            join_url,
            qr_image_url,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct RecordResponse {
    pub student_name: String,
    pub student_identity: Option<String>,
    pub joined_at: String, // RFC3339
}

impl From<AttendanceRecord> for RecordResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            student_name: r.student_name,
            student_identity: r.student_identity,
            joined_at: r.joined_at.to_rfc3339(),
        }
    }
}
