use axum::{Router, middleware::from_fn, routing::get};

use crate::auth::guards::allow_authenticated;
use crate::state::AppContext;

pub mod emit;
pub mod handlers;
pub mod payload;
pub mod topics;

use handlers::attendance_session_ws_handler;

pub fn ws_attendance_routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/{owner_id}/{session_id}",
            get(attendance_session_ws_handler),
        )
        .route_layer(from_fn(allow_authenticated))
}
