/// Topic carrying every live event of one session's attendance feed.
pub fn attendance_session_topic(session_id: &str) -> String {
    format!("attendance:session:{session_id}")
}
