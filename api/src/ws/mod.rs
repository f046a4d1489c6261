//! WebSocket entry point for `/ws/...`. One topic family: per-session
//! attendance feeds for the lecturer dashboard.

use crate::state::AppContext;
use axum::Router;

pub mod attendance;

pub fn ws_routes(app_state: AppContext) -> Router {
    Router::new()
        .nest("/attendance", attendance::ws_attendance_routes())
        .with_state(app_state)
}
