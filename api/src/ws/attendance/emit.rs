use util::ws::WebSocketManager;

use super::payload;
use super::topics::attendance_session_topic;

/* ---------- one-liner helpers ---------- */

pub async fn attendance_marked(ws: &WebSocketManager, p: payload::AttendanceMarked) {
    let topic = attendance_session_topic(&p.session_id);
    util::ws::emit(ws, &topic, "attendance.marked", &p).await;
}

pub async fn session_deleted(ws: &WebSocketManager, p: payload::SessionDeleted) {
    let topic = attendance_session_topic(&p.session_id);
    util::ws::emit(ws, &topic, "attendance.session_deleted", &p).await;
}
