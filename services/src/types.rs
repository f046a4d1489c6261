use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One lecturer-initiated attendance-taking window, keyed by owner + opaque
/// session token. Backend-agnostic mirror of the persisted row/document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: String,
    pub owner_id: String,
    pub start_time: DateTime<Utc>,
    pub active: bool,
}

impl From<db::models::class_session::Model> for ClassSession {
    fn from(m: db::models::class_session::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            start_time: m.start_time,
            active: m.active,
        }
    }
}

/// One student's proof-of-presence entry. Immutable after creation; removed
/// only when its session is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub session_id: String,
    pub dedup_key: String,
    pub student_name: String,
    pub student_identity: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// The identity value used to prevent duplicate records: the stable
    /// per-student identity when one exists, otherwise the exact display
    /// name. Name collisions between different students without identities
    /// are an accepted ambiguity of the fallback.
    pub fn dedup_key_for(student_identity: Option<&str>, display_name: &str) -> String {
        match student_identity {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => display_name.to_string(),
        }
    }
}

impl From<db::models::attendance_record::Model> for AttendanceRecord {
    fn from(m: db::models::attendance_record::Model) -> Self {
        Self {
            session_id: m.session_id,
            dedup_key: m.dedup_key,
            student_name: m.student_name,
            student_identity: m.student_identity,
            joined_at: m.joined_at,
        }
    }
}
