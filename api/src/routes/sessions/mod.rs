use crate::state::AppContext;
use axum::{
    Router,
    routing::{delete, get, post},
};

mod common;
mod delete;
mod get;
mod post;

pub use common::{RecordResponse, SessionResponse};
pub use delete::end_session;
pub use get::{get_current_session, list_session_records};
pub use post::create_session;

/// `/sessions` route group (lecturer side). The whole group sits behind
/// `allow_authenticated`; handlers read the owner id from the claims.
pub fn session_routes() -> Router<AppContext> {
    Router::new()
        .route("/", post(create_session))
        .route("/current", get(get_current_session))
        .route("/{session_id}", delete(end_session))
        .route("/{session_id}/records", get(list_session_records))
}
